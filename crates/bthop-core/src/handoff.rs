//! The handoff controller.
//!
//! Drives a single device transition between the local machine and one
//! remote endpoint:
//!
//! ```text
//! Start → Querying → { Pushing | Pulling } → { Done | Reverting → Done } | Failed
//! ```
//!
//! The connection-state query is a point-in-time read. Nothing prevents
//! the real state from changing before the transition executes (user
//! action, RF disconnect); that race is accepted for a single-user,
//! single-invocation tool. All steps run strictly in sequence and each
//! command executes exactly once — the only resilience mechanism is the
//! push path's single-shot local reconnect.

use std::fmt;

use tracing::{info, warn};

use crate::driver::Bluetooth;
use crate::error::CoreError;
use crate::model::{Device, Endpoint};

// ── Phase / outcome ─────────────────────────────────────────────────

/// Transition phase, traced as the controller moves through the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Querying,
    Pushing,
    Pulling,
    Reverting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Querying => write!(f, "querying"),
            Self::Pushing => write!(f, "pushing"),
            Self::Pulling => write!(f, "pulling"),
            Self::Reverting => write!(f, "reverting"),
        }
    }
}

/// Terminal outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The device moved from this machine to the target.
    Pushed,
    /// The device moved to this machine.
    Pulled,
    /// The target resolved to this machine; nothing was done.
    SelfTarget,
}

// ── Controller ──────────────────────────────────────────────────────

/// State machine for one device handoff.
///
/// Generic over the driver trait so the transition logic is testable
/// without a bluetooth stack. Single-instance, single-shot: no lock
/// guards against concurrent invocations targeting the same device.
#[derive(Debug)]
pub struct Handoff<L, R> {
    device: Device,
    /// Identity of the machine executing the controller.
    local_host: String,
    /// The resolved remote endpoint descriptor.
    target: Endpoint,
    local: L,
    remote: R,
}

impl<L: Bluetooth, R: Bluetooth> Handoff<L, R> {
    pub fn new(
        device: Device,
        local_host: impl Into<String>,
        target: Endpoint,
        local: L,
        remote: R,
    ) -> Self {
        Self {
            device,
            local_host: local_host.into(),
            target,
            local,
            remote,
        }
    }

    /// Run the transition to completion.
    pub async fn run(&self) -> Result<Outcome, CoreError> {
        // Self-targeting guard: a target that resolves to this machine
        // is a no-op, before any bluetooth command is issued.
        if self.target.address == self.local_host {
            warn!(
                target = %self.target.name,
                "target resolves to this machine, nothing to hand off"
            );
            return Ok(Outcome::SelfTarget);
        }

        info!(
            phase = %Phase::Querying,
            device = %self.device.name,
            mac = %self.device.mac,
            "checking local connection state"
        );

        if self.local.is_connected(&self.device.mac).await {
            self.push().await
        } else {
            self.pull().await
        }
    }

    /// The device is connected here: release it locally, then connect it
    /// on the target.
    async fn push(&self) -> Result<Outcome, CoreError> {
        info!(
            phase = %Phase::Pushing,
            target = %self.target.name,
            "device connected locally, pushing"
        );

        // Local release is a required step. A connect on the target is
        // meaningless while this end still holds the link, so a failure
        // here aborts the push.
        self.local.disconnect(&self.device.mac).await?;

        match self.remote.connect(&self.device.mac).await {
            Ok(()) => {
                info!(device = %self.device.name, target = %self.target.name, "push complete");
                Ok(Outcome::Pushed)
            }
            Err(err) => {
                warn!(
                    phase = %Phase::Reverting,
                    error = %err,
                    "remote connect failed, restoring local connection"
                );
                // Best-effort safety net, one attempt, not itself
                // protected: the device ends up back here if it works,
                // connected nowhere if it does not. Either way the
                // original remote failure is what surfaces.
                if let Err(revert_err) = self.local.connect(&self.device.mac).await {
                    warn!(error = %revert_err, "revert failed, device may be connected nowhere");
                }
                Err(err)
            }
        }
    }

    /// The device is not connected here: make sure the target has let it
    /// go, then connect it locally.
    async fn pull(&self) -> Result<Outcome, CoreError> {
        info!(
            phase = %Phase::Pulling,
            target = %self.target.name,
            "device not connected locally, pulling"
        );

        // Speculative release on the target. The goal is local
        // connectivity, not proof of remote release, so any failure is
        // logged and skipped.
        if let Err(err) = self.remote.disconnect(&self.device.mac).await {
            warn!(
                target = %self.target.name,
                error = %err,
                "could not confirm release on target, proceeding"
            );
        }

        // No compensation on failure: there is nothing sensible to
        // revert to, the device may now be connected nowhere.
        self.local.connect(&self.device.mac).await?;

        info!(device = %self.device.name, "pull complete");
        Ok(Outcome::Pulled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ChannelKind, MacAddress, StackKind};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Scripted driver: fixed answers, shared call log.
    #[derive(Clone, Default)]
    struct ScriptedDriver {
        connected: bool,
        /// Diagnostic text of the connect failure, if connect should fail.
        fail_connect: Option<&'static str>,
        /// Diagnostic text of the disconnect failure, if it should fail.
        fail_disconnect: Option<&'static str>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ScriptedDriver {
        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap().push(op);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Bluetooth for ScriptedDriver {
        async fn is_connected(&self, _mac: &MacAddress) -> bool {
            self.record("is_connected");
            self.connected
        }

        async fn connect(&self, _mac: &MacAddress) -> Result<(), CoreError> {
            self.record("connect");
            match self.fail_connect {
                Some(diagnostic) => Err(CoreError::CommandFailed {
                    command: "bluetoothctl connect".into(),
                    diagnostic: diagnostic.into(),
                }),
                None => Ok(()),
            }
        }

        async fn disconnect(&self, _mac: &MacAddress) -> Result<(), CoreError> {
            self.record("disconnect");
            match self.fail_disconnect {
                Some(diagnostic) => Err(CoreError::CommandFailed {
                    command: "bluetoothctl disconnect".into(),
                    diagnostic: diagnostic.into(),
                }),
                None => Ok(()),
            }
        }
    }

    fn device() -> Device {
        Device::new(MacAddress::new("F4:73:35:8B:70:21"), "headphones")
    }

    fn remote_endpoint() -> Endpoint {
        Endpoint {
            name: "desktop".into(),
            address: "desktop.lan".into(),
            user: "pi".into(),
            channel: ChannelKind::Ssh,
            stack: StackKind::Bluez,
        }
    }

    fn handoff(
        local: ScriptedDriver,
        remote: ScriptedDriver,
    ) -> Handoff<ScriptedDriver, ScriptedDriver> {
        Handoff::new(device(), "laptop", remote_endpoint(), local, remote)
    }

    #[tokio::test]
    async fn push_succeeds() {
        let local = ScriptedDriver {
            connected: true,
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver::default();
        let run = handoff(local.clone(), remote.clone());

        let outcome = run.run().await.unwrap();

        assert_eq!(outcome, Outcome::Pushed);
        assert_eq!(local.calls(), vec!["is_connected", "disconnect"]);
        assert_eq!(remote.calls(), vec!["connect"]);
    }

    #[tokio::test]
    async fn push_reverts_once_on_remote_failure() {
        let local = ScriptedDriver {
            connected: true,
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver {
            fail_connect: Some("remote refused"),
            ..ScriptedDriver::default()
        };
        let run = handoff(local.clone(), remote.clone());

        let err = run.run().await.unwrap_err();

        // Exactly one local reconnect attempt, and the remote failure is
        // what surfaces.
        assert_eq!(local.calls(), vec!["is_connected", "disconnect", "connect"]);
        assert_eq!(remote.calls(), vec!["connect"]);
        assert_eq!(err.diagnostic(), Some("remote refused"));
    }

    #[tokio::test]
    async fn push_failure_surfaces_even_when_revert_fails() {
        let local = ScriptedDriver {
            connected: true,
            fail_connect: Some("local revert failed"),
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver {
            fail_connect: Some("remote refused"),
            ..ScriptedDriver::default()
        };
        let run = handoff(local.clone(), remote.clone());

        let err = run.run().await.unwrap_err();

        assert_eq!(local.calls(), vec!["is_connected", "disconnect", "connect"]);
        assert_eq!(err.diagnostic(), Some("remote refused"));
    }

    #[tokio::test]
    async fn push_aborts_when_local_release_fails() {
        let local = ScriptedDriver {
            connected: true,
            fail_disconnect: Some("org.bluez.Error.Failed"),
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver::default();
        let run = handoff(local.clone(), remote.clone());

        let err = run.run().await.unwrap_err();

        assert_eq!(err.diagnostic(), Some("org.bluez.Error.Failed"));
        assert_eq!(local.calls(), vec!["is_connected", "disconnect"]);
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn pull_succeeds() {
        let local = ScriptedDriver::default();
        let remote = ScriptedDriver::default();
        let run = handoff(local.clone(), remote.clone());

        let outcome = run.run().await.unwrap();

        assert_eq!(outcome, Outcome::Pulled);
        assert_eq!(local.calls(), vec!["is_connected", "connect"]);
        assert_eq!(remote.calls(), vec!["disconnect"]);
    }

    #[tokio::test]
    async fn pull_proceeds_past_remote_disconnect_failure() {
        let local = ScriptedDriver::default();
        let remote = ScriptedDriver {
            fail_disconnect: Some("Device f4:73:35:8b:70:21 not available"),
            ..ScriptedDriver::default()
        };
        let run = handoff(local.clone(), remote.clone());

        let outcome = run.run().await.unwrap();

        assert_eq!(outcome, Outcome::Pulled);
        assert_eq!(local.calls(), vec!["is_connected", "connect"]);
    }

    #[tokio::test]
    async fn pull_has_no_compensation() {
        let local = ScriptedDriver {
            fail_connect: Some("br-connection-profile-unavailable"),
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver::default();
        let run = handoff(local.clone(), remote.clone());

        let err = run.run().await.unwrap_err();

        assert_eq!(err.diagnostic(), Some("br-connection-profile-unavailable"));
        // One connect attempt, nothing after it.
        assert_eq!(local.calls(), vec!["is_connected", "connect"]);
        assert_eq!(remote.calls(), vec!["disconnect"]);
    }

    #[tokio::test]
    async fn self_target_short_circuits() {
        let local = ScriptedDriver {
            connected: true,
            ..ScriptedDriver::default()
        };
        let remote = ScriptedDriver::default();
        let mut target = remote_endpoint();
        target.address = "laptop".into();
        let run = Handoff::new(device(), "laptop", target, local.clone(), remote.clone());

        let outcome = run.run().await.unwrap();

        assert_eq!(outcome, Outcome::SelfTarget);
        assert!(local.calls().is_empty());
        assert!(remote.calls().is_empty());
    }
}
