//! Clap derive structures for the `bthop` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bthop -- hand a bluetooth device off between machines
#[derive(Debug, Parser)]
#[command(
    name = "bthop",
    version,
    about = "Hand a paired bluetooth device off between machines",
    long_about = "Moves a paired bluetooth device between this machine and a remote host.\n\n\
        If the device is connected here it is pushed to the target; otherwise\n\
        it is pulled back. Remote hosts are reached over ssh and drive their\n\
        own bluetooth stack.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the configuration file
    #[arg(long, env = "BTHOP_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hand the device off (push if connected here, pull otherwise)
    #[command(alias = "sw")]
    Switch(SwitchArgs),

    /// Inspect the CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Switch ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Target host alias (defaults to this hostname's default_target)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Device alias (defaults to this hostname's default_device)
    #[arg(value_name = "DEVICE")]
    pub device: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the loaded configuration
    Show {
        /// Emit JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
