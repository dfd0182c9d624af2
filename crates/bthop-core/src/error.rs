//! Core error taxonomy.
//!
//! Two classes, handled very differently by callers:
//!
//! - **Execution failures** — a single command invocation failed
//!   (non-zero exit, timeout, missing executable, spawn error). Each
//!   carries the attempted command line; the calling layer decides
//!   whether the failure is expected (speculative disconnect) or must
//!   bubble up (required connect). Commands run exactly once — there are
//!   no retries anywhere in this crate.
//!
//! - **Configuration failures** — the world is mis-set in a way the
//!   controller cannot repair (an endpoint declares a channel the
//!   factory cannot build). Always fatal, never retried.

use thiserror::Error;

use crate::model::ChannelKind;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Execution failures ───────────────────────────────────────────
    #[error("command failed: {command}")]
    CommandFailed {
        command: String,
        /// Captured standard error, trimmed.
        diagnostic: String,
    },

    #[error("command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("executable not found: {program}")]
    MissingBinary { program: String },

    #[error("failed to spawn command: {command}: {message}")]
    Spawn { command: String, message: String },

    // ── Configuration failures ───────────────────────────────────────
    #[error("host '{host}' declares channel '{channel}', which cannot reach a remote machine")]
    UnsupportedChannel { host: String, channel: ChannelKind },
}

impl CoreError {
    /// Whether this error is a failed command invocation (as opposed to
    /// a configuration problem discovered before any command ran).
    pub fn is_execution_failure(&self) -> bool {
        !matches!(self, Self::UnsupportedChannel { .. })
    }

    /// Captured diagnostic text, if the underlying process produced any.
    ///
    /// Drivers inspect this to classify expected failures (a disconnect
    /// of an already-absent device). Only `CommandFailed` carries it.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}
