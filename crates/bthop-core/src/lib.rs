//! Core logic for `bthop`, a bluetooth device handoff tool.
//!
//! A paired device (headphones, keyboard) can only hold a connection to
//! one machine at a time. This crate decides whether the device should be
//! *pushed* from this machine to a remote host or *pulled* back here, and
//! drives the transition:
//!
//! - **[`Handoff`]** — the controller. Queries the local connection state,
//!   branches into the push or pull path, and compensates with a single
//!   best-effort local reconnect when a push fails mid-flight.
//!
//! - **[`Driver`]** — bluetooth stack drivers ([`BluezDriver`] over
//!   `bluetoothctl` is the one in-scope implementation), built over an
//!   [`Executor`] and selected per endpoint by [`Driver::for_endpoint`].
//!
//! - **[`Executor`]** — runs a command vector either directly on this
//!   machine or on a remote host over `ssh`, with a bounded timeout and
//!   locale-independent output.
//!
//! - **Model** ([`model`]) — the immutable value objects ([`Device`],
//!   [`Endpoint`], [`MacAddress`]) passed between the layers. This crate
//!   never parses configuration; it receives pre-validated values.
//!
//! Execution is fully sequential: each step blocks until the external
//! process completes or times out, and no command is ever retried.

pub mod driver;
pub mod error;
pub mod exec;
pub mod handoff;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use driver::{Bluetooth, BluezDriver, Driver};
pub use error::CoreError;
pub use exec::{Execute, Executor, LocalExecutor, SshExecutor};
pub use handoff::{Handoff, Outcome};
pub use model::{ChannelKind, Device, Endpoint, MacAddress, StackKind, local_hostname};
