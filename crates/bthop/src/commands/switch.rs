//! The handoff run: resolve aliases, build drivers, drive the transition.

use bthop_core::{Driver, Handoff, Outcome, local_hostname};

use crate::cli::{GlobalOpts, SwitchArgs};
use crate::commands;
use crate::error::CliError;

pub async fn handle(args: SwitchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = commands::load_config(global)?;
    let hostname = local_hostname().ok_or(CliError::NoHostname)?;

    let plan = bthop_config::resolve(
        &config,
        &hostname,
        args.target.as_deref(),
        args.device.as_deref(),
    )?;

    tracing::debug!(
        device = %plan.device.name,
        mac = %plan.device.mac,
        target = %plan.remote.name,
        "resolved handoff plan"
    );

    let device_name = plan.device.name.clone();
    let target_name = plan.remote.name.clone();

    let local = Driver::for_endpoint(&plan.local, true)?;
    let remote = Driver::for_endpoint(&plan.remote, false)?;

    let handoff = Handoff::new(plan.device, hostname, plan.remote, local, remote);

    let outcome = handoff.run().await?;
    if !global.quiet {
        match outcome {
            Outcome::Pushed => println!("pushed {device_name} to {target_name}"),
            Outcome::Pulled => println!("pulled {device_name} to this machine"),
            // The warning is already on stderr via tracing.
            Outcome::SelfTarget => {}
        }
    }
    Ok(())
}
