//! Configuration loading and alias resolution for `bthop`.
//!
//! Owns the TOML schema and its validation; core never sees these types.
//! The single boundary into `bthop-core` is [`resolve`], which turns
//! aliases plus per-hostname defaults into pre-validated [`Device`] and
//! [`Endpoint`] values.
//!
//! ```toml
//! [devices.headphones]
//! mac = "F4:73:35:8B:70:21"
//! name = "WH-1000XM4"
//!
//! [hosts.desktop]
//! address = "desktop.lan"
//! user = "pi"
//! channel = "ssh"      # "ssh" | "local", default "ssh"
//! stack = "bluez"      # default "bluez"
//!
//! [defaults.laptop]    # keyed by local hostname
//! default_device = "headphones"
//! default_target = "desktop"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bthop_core::{ChannelKind, Device, Endpoint, MacAddress, StackKind};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Parse(Box<figment::Error>),

    #[error("device '{alias}' not found in [devices]")]
    UnknownDevice { alias: String, available: String },

    #[error("host '{alias}' not found in [hosts]")]
    UnknownHost { alias: String, available: String },

    #[error("hostname '{hostname}' has no entry in [defaults]")]
    NoDefaults { hostname: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Parse(Box::new(err))
    }
}

// ── TOML schema ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Device aliases.
    #[serde(default)]
    pub devices: HashMap<String, DeviceEntry>,

    /// Host aliases.
    #[serde(default)]
    pub hosts: HashMap<String, HostEntry>,

    /// Per-local-hostname defaults, applied when CLI arguments are
    /// omitted.
    #[serde(default)]
    pub defaults: HashMap<String, Defaults>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceEntry {
    pub mac: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HostEntry {
    pub address: String,

    #[serde(default)]
    pub user: String,

    #[serde(default = "default_channel")]
    pub channel: ChannelKind,

    #[serde(default = "default_stack")]
    pub stack: StackKind,
}

fn default_channel() -> ChannelKind {
    ChannelKind::Ssh
}

fn default_stack() -> StackKind {
    StackKind::Bluez
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    pub default_device: String,
    pub default_target: String,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bthop", "bthop")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("bthop");
            p.push("config.toml");
            p
        })
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the configuration from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the configuration from an explicit path (`--config`).
///
/// A missing file is an error: unlike tools that can run unconfigured,
/// a handoff needs device and host aliases to mean anything.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("BTHOP_").split("__"))
        .extract()?;
    Ok(config)
}

// ── Alias resolution ────────────────────────────────────────────────

/// The fully resolved inputs of one handoff run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub device: Device,
    /// The remote endpoint the device is pushed to or pulled from.
    pub remote: Endpoint,
    /// The synthesized endpoint for the machine executing the run.
    pub local: Endpoint,
}

/// Resolve CLI arguments against per-hostname defaults into core values.
///
/// Omitted arguments fall back to the `[defaults.<hostname>]` entry;
/// a hostname without defaults is only an error when a fallback is
/// actually needed.
pub fn resolve(
    config: &Config,
    hostname: &str,
    target: Option<&str>,
    device: Option<&str>,
) -> Result<Plan, ConfigError> {
    let defaults = config.defaults.get(hostname);

    let target_alias = match target {
        Some(alias) => alias.to_owned(),
        None => defaults
            .map(|d| d.default_target.clone())
            .ok_or_else(|| ConfigError::NoDefaults {
                hostname: hostname.to_owned(),
            })?,
    };

    let device_alias = match device {
        Some(alias) => alias.to_owned(),
        None => defaults
            .map(|d| d.default_device.clone())
            .ok_or_else(|| ConfigError::NoDefaults {
                hostname: hostname.to_owned(),
            })?,
    };

    let host = config
        .hosts
        .get(&target_alias)
        .ok_or_else(|| ConfigError::UnknownHost {
            alias: target_alias.clone(),
            available: sorted_keys(&config.hosts),
        })?;

    let entry = config
        .devices
        .get(&device_alias)
        .ok_or_else(|| ConfigError::UnknownDevice {
            alias: device_alias.clone(),
            available: sorted_keys(&config.devices),
        })?;

    Ok(Plan {
        device: Device::new(MacAddress::new(&entry.mac), &entry.name),
        remote: Endpoint {
            name: target_alias,
            address: host.address.clone(),
            user: host.user.clone(),
            channel: host.channel,
            stack: host.stack,
        },
        local: Endpoint::local(hostname),
    })
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> String {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys.join(", ")
}
