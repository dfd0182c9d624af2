//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands;
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", commands::effective_config_path(global).display());
            Ok(())
        }

        ConfigCommand::Show { json } => {
            let config = commands::load_config(global)?;
            let rendered = if json {
                serde_json::to_string_pretty(&config).map_err(|e| CliError::Render {
                    message: e.to_string(),
                })?
            } else {
                toml::to_string_pretty(&config).map_err(|e| CliError::Render {
                    message: e.to_string(),
                })?
            };
            println!("{rendered}");
            Ok(())
        }
    }
}
