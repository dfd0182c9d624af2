//! Endpoint and device model.
//!
//! Immutable value objects shared by every layer. Built once from
//! configuration at process start, never mutated during a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── MacAddress ──────────────────────────────────────────────────────

/// Hardware address, normalized to lowercase colon-separated format
/// (aa:bb:cc:dd:ee:ff). The unique key of a [`Device`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or mixed-case input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// A paired bluetooth device, identified by its hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub mac: MacAddress,
    /// Display name, used for logging only.
    pub name: String,
}

impl Device {
    pub fn new(mac: MacAddress, name: impl Into<String>) -> Self {
        Self {
            mac,
            name: name.into(),
        }
    }
}

// ── Endpoint descriptor ─────────────────────────────────────────────

/// Execution channel for reaching an endpoint. Closed set: commands run
/// either as direct child processes or wrapped in an `ssh` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Local,
    Ssh,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Ssh => write!(f, "ssh"),
        }
    }
}

/// Bluetooth stack running on an endpoint. One in-scope implementation;
/// the closed set leaves room for others (e.g. macOS `blueutil`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Bluez,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bluez => write!(f, "bluez"),
        }
    }
}

/// A host capable of running bluetooth-stack commands.
///
/// Exactly one endpoint in a run is the machine executing the controller;
/// all others are remote. Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Alias from configuration, used for logging and error messages.
    pub name: String,
    /// Network address (hostname or IP). For the local endpoint this is
    /// the machine's own hostname, used by the self-targeting guard.
    pub address: String,
    /// Authentication principal for the remote shell. Empty for local.
    pub user: String,
    pub channel: ChannelKind,
    pub stack: StackKind,
}

impl Endpoint {
    /// The implicit endpoint for the machine executing the controller.
    pub fn local(hostname: impl Into<String>) -> Self {
        Self {
            name: "local".into(),
            address: hostname.into(),
            user: String::new(),
            channel: ChannelKind::Local,
            stack: StackKind::Bluez,
        }
    }
}

// ── Local host identity ─────────────────────────────────────────────

/// The local machine's hostname, read once at process start.
///
/// Returns `None` when the hostname cannot be determined or is not
/// valid UTF-8.
pub fn local_hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
}
