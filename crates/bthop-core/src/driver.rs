//! Bluetooth stack drivers and the per-endpoint driver factory.
//!
//! A driver issues device-query/connect/disconnect operations through one
//! executor. [`BluezDriver`] wraps `bluetoothctl`; the closed [`Driver`]
//! set leaves room for further stacks without opening dynamic dispatch.

use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;
use crate::exec::{Execute, Executor, LocalExecutor, SshExecutor};
use crate::model::{ChannelKind, Endpoint, MacAddress, StackKind};

/// Status queries are cheap and frequent; keep them short.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Connect is the slowest operation (pairing negotiation, RF retries
/// inside the stack itself).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(8);

// ── Bluetooth trait ─────────────────────────────────────────────────

/// Driver operations, generic over the bluetooth stack.
///
/// The handoff controller is generic over this trait; tests substitute
/// scripted implementations.
#[allow(async_fn_in_trait)]
pub trait Bluetooth {
    /// Whether the device is currently connected at this endpoint.
    ///
    /// A point-in-time read, never cached. This operation never raises:
    /// any execution failure (including timeout) maps to `false`.
    async fn is_connected(&self, mac: &MacAddress) -> bool;

    /// Connect the device at this endpoint. Failures propagate.
    async fn connect(&self, mac: &MacAddress) -> Result<(), CoreError>;

    /// Disconnect the device at this endpoint.
    ///
    /// Idempotent: callers frequently disconnect speculatively ("make
    /// sure it's not connected here"), so a failure indicating the
    /// device was already absent is a successful no-op. All other
    /// failures propagate.
    async fn disconnect(&self, mac: &MacAddress) -> Result<(), CoreError>;
}

// ── BlueZ driver ────────────────────────────────────────────────────

/// Driver for the BlueZ stack, speaking `bluetoothctl`.
#[derive(Debug, Clone)]
pub struct BluezDriver<E> {
    exec: E,
}

impl<E> BluezDriver<E> {
    pub fn new(exec: E) -> Self {
        Self { exec }
    }
}

impl<E: Execute> Bluetooth for BluezDriver<E> {
    async fn is_connected(&self, mac: &MacAddress) -> bool {
        match self
            .exec
            .run(&["bluetoothctl", "info", mac.as_str()], QUERY_TIMEOUT)
            .await
        {
            Ok(output) => classify::connected_marker(&output),
            Err(err) => {
                debug!(mac = %mac, error = %err, "status query failed, treating as disconnected");
                false
            }
        }
    }

    async fn connect(&self, mac: &MacAddress) -> Result<(), CoreError> {
        self.exec
            .run(&["bluetoothctl", "connect", mac.as_str()], CONNECT_TIMEOUT)
            .await
            .map(drop)
    }

    async fn disconnect(&self, mac: &MacAddress) -> Result<(), CoreError> {
        match self
            .exec
            .run(
                &["bluetoothctl", "disconnect", mac.as_str()],
                DISCONNECT_TIMEOUT,
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if classify::indicates_absent(&err) => {
                debug!(mac = %mac, "device already absent, disconnect is a no-op");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

// ── Output classification ───────────────────────────────────────────

/// The textual contract with `bluetoothctl`, isolated here because it is
/// the integration point most sensitive to the tool's exact phrasing.
///
/// Exit status is the primary success signal for connect and disconnect;
/// text is consulted in exactly two places:
///
/// - the `info` query reports connection state with a `Connected: yes`
///   line (stable across BlueZ 5.x);
/// - a failed `disconnect` whose stderr contains `not available`
///   (BlueZ: "Device <mac> not available") means the device was already
///   gone from this endpoint.
///
/// Any change to these phrases in a future BlueZ release lands here and
/// nowhere else.
mod classify {
    use crate::error::CoreError;

    /// Does the `info` output report the device as connected?
    pub(super) fn connected_marker(output: &str) -> bool {
        output.contains("Connected: yes")
    }

    /// Does this failure mean the device was already absent?
    pub(super) fn indicates_absent(err: &CoreError) -> bool {
        err.diagnostic()
            .is_some_and(|text| text.to_lowercase().contains("not available"))
    }
}

// ── Driver factory ──────────────────────────────────────────────────

/// Closed set of stack drivers, selected per endpoint.
#[derive(Debug, Clone)]
pub enum Driver {
    Bluez(BluezDriver<Executor>),
}

impl Driver {
    /// Construct the executor + driver pair for an endpoint.
    ///
    /// Locality selects the execution channel: the local endpoint always
    /// spawns directly, a remote endpoint must declare a channel capable
    /// of reaching it. Unsupported combinations are configuration-time
    /// failures, never retried.
    pub fn for_endpoint(endpoint: &Endpoint, is_local: bool) -> Result<Self, CoreError> {
        let exec = if is_local {
            Executor::Local(LocalExecutor)
        } else {
            match endpoint.channel {
                ChannelKind::Ssh => Executor::Ssh(SshExecutor::for_endpoint(endpoint)),
                ChannelKind::Local => {
                    return Err(CoreError::UnsupportedChannel {
                        host: endpoint.name.clone(),
                        channel: ChannelKind::Local,
                    });
                }
            }
        };

        match endpoint.stack {
            StackKind::Bluez => Ok(Self::Bluez(BluezDriver::new(exec))),
        }
    }
}

impl Bluetooth for Driver {
    async fn is_connected(&self, mac: &MacAddress) -> bool {
        match self {
            Self::Bluez(driver) => driver.is_connected(mac).await,
        }
    }

    async fn connect(&self, mac: &MacAddress) -> Result<(), CoreError> {
        match self {
            Self::Bluez(driver) => driver.connect(mac).await,
        }
    }

    async fn disconnect(&self, mac: &MacAddress) -> Result<(), CoreError> {
        match self {
            Self::Bluez(driver) => driver.disconnect(mac).await,
        }
    }
}
