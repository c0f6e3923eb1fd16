//! Smoke tests for the pulsenet CLI.
//!
//! These tests verify basic CLI functionality:
//! - `pulsenet --version` outputs version info
//! - `pulsenet --help` outputs help text
//! - a missing subcommand is a usage error

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the pulsenet binary.
fn pulsenet() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pulsenet"))
}

#[test]
fn test_version_flag() {
    pulsenet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulsenet"))
        .stdout(predicate::str::contains("0.1.0"))
        .stdout(predicate::str::contains("commit"));
}

#[test]
fn test_help_flag() {
    pulsenet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("--human"));
}

#[test]
fn test_help_flag_short() {
    pulsenet()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_args_is_usage_error() {
    pulsenet()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_render_help() {
    pulsenet()
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--frames"))
        .stdout(predicate::str::contains("--pointer"));
}
