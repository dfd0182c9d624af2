//! Subcommand handlers.

pub mod config_cmd;
pub mod switch;

use std::path::PathBuf;

use bthop_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The effective config path: `--config` / `BTHOP_CONFIG` override, then
/// the platform default.
pub(crate) fn effective_config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(bthop_config::config_path)
}

/// Load the configuration, honoring the `--config` override.
pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(bthop_config::load_config_from(&effective_config_path(
        global,
    ))?)
}
