//! Command execution: local child processes and remote shells.
//!
//! Both variants satisfy the same contract: run a command vector with a
//! bounded timeout, return the trimmed standard output on zero exit, and
//! fail with an execution error carrying the attempted command line and
//! captured diagnostics otherwise. Exactly one attempt per call.

use std::borrow::Cow;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::trace;

use crate::error::CoreError;
use crate::model::Endpoint;

/// Connection-establishment timeout handed to `ssh` itself, separate
/// from the per-command timeout enforced on the whole invocation.
const SSH_CONNECT_TIMEOUT_SECS: u32 = 5;

// ── Execute trait ───────────────────────────────────────────────────

/// The execution seam. Production code holds the closed [`Executor`]
/// enum; tests substitute scripted implementations.
#[allow(async_fn_in_trait)]
pub trait Execute {
    /// Run `argv`, returning trimmed stdout on success.
    async fn run(&self, argv: &[&str], timeout: Duration) -> Result<String, CoreError>;
}

// ── Local variant ───────────────────────────────────────────────────

/// Spawns the command vector directly as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

impl Execute for LocalExecutor {
    async fn run(&self, argv: &[&str], timeout: Duration) -> Result<String, CoreError> {
        run_child(argv, timeout).await
    }
}

// ── Remote-shell variant ────────────────────────────────────────────

/// Wraps the command vector in a single `ssh` invocation and runs it as
/// one remote command line.
///
/// Host-identity verification is disabled and verbosity suppressed: the
/// target hosts come from the user's own configuration, and stderr is
/// reserved for the remote command's diagnostics.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    user: String,
    address: String,
}

impl SshExecutor {
    pub fn new(user: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            address: address.into(),
        }
    }

    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self::new(&endpoint.user, &endpoint.address)
    }

    /// The full argv of the wrapping `ssh` invocation.
    fn ssh_argv(&self, argv: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = [
            "ssh",
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "LogLevel=ERROR",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        full.push("-o".into());
        full.push(format!("ConnectTimeout={SSH_CONNECT_TIMEOUT_SECS}"));
        full.push(format!("{}@{}", self.user, self.address));
        full.push("--".into());
        full.push(join_command(argv));
        full
    }
}

impl Execute for SshExecutor {
    async fn run(&self, argv: &[&str], timeout: Duration) -> Result<String, CoreError> {
        let full = self.ssh_argv(argv);
        let full_refs: Vec<&str> = full.iter().map(String::as_str).collect();
        run_child(&full_refs, timeout).await
    }
}

// ── Closed executor set ─────────────────────────────────────────────

/// Static-dispatch union of the two execution channels.
#[derive(Debug, Clone)]
pub enum Executor {
    Local(LocalExecutor),
    Ssh(SshExecutor),
}

impl Execute for Executor {
    async fn run(&self, argv: &[&str], timeout: Duration) -> Result<String, CoreError> {
        match self {
            Self::Local(exec) => exec.run(argv, timeout).await,
            Self::Ssh(exec) => exec.run(argv, timeout).await,
        }
    }
}

// ── Child process plumbing ──────────────────────────────────────────

async fn run_child(argv: &[&str], timeout: Duration) -> Result<String, CoreError> {
    let command_line = join_command(argv);
    let Some((program, args)) = argv.split_first() else {
        return Err(CoreError::Spawn {
            command: command_line,
            message: "empty command vector".into(),
        });
    };

    trace!(command = %command_line, timeout_secs = timeout.as_secs(), "spawning");

    let mut cmd = Command::new(program);
    cmd.args(args)
        // Fixed locale so output string-matching is deterministic.
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoreError::MissingBinary {
                program: (*program).to_owned(),
            });
        }
        Ok(Err(err)) => {
            return Err(CoreError::Spawn {
                command: command_line,
                message: err.to_string(),
            });
        }
        // kill_on_drop reaps the child when the output future is dropped.
        Err(_) => {
            return Err(CoreError::Timeout {
                command: command_line,
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    } else {
        Err(CoreError::CommandFailed {
            command: command_line,
            diagnostic: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

/// Join a command vector into a single shell-safe command line, for the
/// remote side of an `ssh` invocation and for error messages.
pub fn join_command(argv: &[&str]) -> String {
    argv.iter()
        .map(|arg| quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
