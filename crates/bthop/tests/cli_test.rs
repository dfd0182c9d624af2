//! Integration tests for the `bthop` binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling — all without a bluetooth stack. The one end-to-end
//! run exercised here is the self-target no-op, which by contract issues
//! no bluetooth commands at all.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `bthop` binary with env isolation.
///
/// Points config directories at a nonexistent path so tests never touch
/// the user's real configuration.
fn bthop_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bthop");
    cmd.env("HOME", "/tmp/bthop-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bthop-test-nonexistent")
        .env_remove("BTHOP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// The kernel hostname, as `bthop` itself will resolve it.
fn hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .unwrap()
        .trim()
        .to_string()
}

/// Write a config file naming this machine as the target host "self".
fn self_target_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = format!(
        r#"
        [devices.phones]
        mac = "F4:73:35:8B:70:21"
        name = "WH-1000XM4"

        [hosts.desktop]
        address = "desktop.lan"
        user = "pi"

        [hosts.self]
        address = "{host}"
        user = "me"

        [defaults."{host}"]
        default_device = "phones"
        default_target = "desktop"
        "#,
        host = hostname()
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, config).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = bthop_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr).to_string()
        + &String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Usage"), "expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_subcommands() {
    bthop_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("switch")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn version_flag() {
    bthop_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bthop"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    bthop_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn completions_zsh() {
    bthop_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn invalid_subcommand() {
    let output = bthop_cmd().arg("teleport").output().unwrap();
    assert!(!output.status.success());
    let text = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(
        text.contains("unrecognized") || text.contains("invalid") || text.contains("teleport"),
        "expected error about the unknown subcommand:\n{text}"
    );
}

#[test]
fn switch_without_config_fails_with_config_exit_code() {
    let output = bthop_cmd().arg("switch").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "expected config exit code");
    let text = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(
        text.contains("configuration"),
        "expected a configuration error:\n{text}"
    );
}

#[test]
fn switch_unknown_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = self_target_config(dir.path());

    let output = bthop_cmd()
        .args(["--config", &config.display().to_string(), "switch", "garage"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let text = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(text.contains("garage"), "expected the unknown alias:\n{text}");
}

// ── Config inspection ───────────────────────────────────────────────

#[test]
fn config_path_honors_override() {
    bthop_cmd()
        .args(["--config", "/tmp/custom-bthop.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/custom-bthop.toml"));
}

#[test]
fn config_show_renders_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let config = self_target_config(dir.path());

    bthop_cmd()
        .args(["--config", &config.display().to_string(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phones").and(predicate::str::contains("desktop")));
}

// ── Self-target no-op ───────────────────────────────────────────────

#[test]
fn switch_to_self_is_a_successful_noop() {
    let dir = tempfile::tempdir().unwrap();
    let config = self_target_config(dir.path());

    // This environment has no bluetooth stack; success proves the guard
    // returned before any driver command was issued.
    bthop_cmd()
        .args([
            "--config",
            &config.display().to_string(),
            "switch",
            "self",
            "phones",
        ])
        .assert()
        .success();
}
