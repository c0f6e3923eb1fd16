//! Common test utilities for pulsenet integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's `~/.config/pulsenet/config.kdl`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated config directory.
///
/// The `pulsenet()` method returns a `Command` that points
/// `PULSENET_CONFIG_DIR` at a temporary directory and clears
/// `PULSENET_CONFIG`, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
    pub work_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the pulsenet binary with isolated configuration.
    pub fn pulsenet(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pulsenet"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("PULSENET_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("PULSENET_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Path of the system config file inside the isolated directory.
    pub fn system_config(&self) -> PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    /// Write the system config file.
    pub fn write_system_config(&self, contents: &str) {
        std::fs::write(self.system_config(), contents).unwrap();
    }

    /// Write a file in the working directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse stdout of a finished command as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
