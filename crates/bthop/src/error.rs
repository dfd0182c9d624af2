//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and class-specific exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bthop_config::ConfigError;
use bthop_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const EXECUTION: i32 = 4;
    pub const TIMEOUT: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Execution ────────────────────────────────────────────────────
    #[error("command failed: {command}")]
    #[diagnostic(
        code(bthop::command_failed),
        help("{diagnostic}")
    )]
    CommandFailed { command: String, diagnostic: String },

    #[error("command timed out after {seconds}s: {command}")]
    #[diagnostic(
        code(bthop::timeout),
        help(
            "The bluetooth stack or the remote host did not respond in time.\n\
             Commands run exactly once; re-run bthop to try again."
        )
    )]
    Timeout { command: String, seconds: u64 },

    #[error("executable not found: {program}")]
    #[diagnostic(
        code(bthop::missing_binary),
        help(
            "bthop shells out to 'bluetoothctl' locally and 'ssh' for remote hosts.\n\
             Make sure '{program}' is installed and on PATH."
        )
    )]
    MissingBinary { program: String },

    #[error("failed to run command: {command}: {message}")]
    #[diagnostic(code(bthop::spawn))]
    Spawn { command: String, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("configuration file not found")]
    #[diagnostic(
        code(bthop::no_config),
        help(
            "Expected at: {path}\n\
             Define [devices.<alias>], [hosts.<alias>] and [defaults.<hostname>] there,\n\
             or point --config at an existing file."
        )
    )]
    NoConfig { path: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(bthop::config))]
    ConfigInvalid { message: String },

    #[error("device '{alias}' not found in [devices]")]
    #[diagnostic(code(bthop::unknown_device), help("Available devices: {available}"))]
    UnknownDevice { alias: String, available: String },

    #[error("host '{alias}' not found in [hosts]")]
    #[diagnostic(code(bthop::unknown_host), help("Available hosts: {available}"))]
    UnknownHost { alias: String, available: String },

    #[error("no defaults for hostname '{hostname}'")]
    #[diagnostic(
        code(bthop::no_defaults),
        help(
            "Add a [defaults.{hostname}] section with default_device and default_target,\n\
             or pass both TARGET and DEVICE explicitly."
        )
    )]
    NoDefaults { hostname: String },

    #[error("host '{host}' declares channel '{channel}', which cannot reach a remote machine")]
    #[diagnostic(
        code(bthop::unsupported_channel),
        help("Set channel = \"ssh\" on the [hosts.{host}] entry.")
    )]
    UnsupportedChannel { host: String, channel: String },

    #[error("could not determine this machine's hostname")]
    #[diagnostic(
        code(bthop::no_hostname),
        help("The hostname selects the [defaults] entry and the self-target guard.")
    )]
    NoHostname,

    // ── IO / rendering ───────────────────────────────────────────────
    #[error("failed to render configuration: {message}")]
    #[diagnostic(code(bthop::render))]
    Render { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { .. } | Self::MissingBinary { .. } | Self::Spawn { .. } => {
                exit_code::EXECUTION
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoConfig { .. }
            | Self::ConfigInvalid { .. }
            | Self::UnknownDevice { .. }
            | Self::UnknownHost { .. }
            | Self::NoDefaults { .. }
            | Self::UnsupportedChannel { .. }
            | Self::NoHostname => exit_code::CONFIG,
            Self::Render { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CommandFailed {
                command,
                diagnostic,
            } => Self::CommandFailed {
                command,
                diagnostic: if diagnostic.is_empty() {
                    "(no diagnostic output)".into()
                } else {
                    diagnostic
                },
            },

            CoreError::Timeout {
                command,
                timeout_secs,
            } => Self::Timeout {
                command,
                seconds: timeout_secs,
            },

            CoreError::MissingBinary { program } => Self::MissingBinary { program },

            CoreError::Spawn { command, message } => Self::Spawn { command, message },

            CoreError::UnsupportedChannel { host, channel } => Self::UnsupportedChannel {
                host,
                channel: channel.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },

            ConfigError::Parse(inner) => Self::ConfigInvalid {
                message: inner.to_string(),
            },

            ConfigError::UnknownDevice { alias, available } => {
                Self::UnknownDevice { alias, available }
            }

            ConfigError::UnknownHost { alias, available } => Self::UnknownHost { alias, available },

            ConfigError::NoDefaults { hostname } => Self::NoDefaults { hostname },
        }
    }
}
