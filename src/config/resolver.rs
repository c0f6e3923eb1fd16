//! Precedence resolution for the renderer configuration.
//!
//! ## Config Precedence (highest to lowest)
//!
//! 1. `--config <path>` CLI flag
//! 2. `PULSENET_CONFIG` environment variable
//! 3. System config.kdl (`~/.config/pulsenet/config.kdl`, or
//!    `$PULSENET_CONFIG_DIR/config.kdl` when that variable is set)
//! 4. Built-in preset (`--preset`, neon by default)
//!
//! A `--preset` flag always chooses the base preset, even when the file
//! names a different one; keys in the file still override it.

use std::fs;
use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::config::{Preset, RendererConfig};
use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PULSENET_CONFIG";

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "PULSENET_CONFIG_DIR";

/// File name of the system config.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from the file passed with `--config`
    CliFlag(PathBuf),
    /// Value from the file named by an environment variable
    EnvVar(String, PathBuf),
    /// Value from the system config file
    System(PathBuf),
    /// Built-in preset
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag(path) => write!(f, "cli:{}", path.display()),
            ValueSource::EnvVar(name, path) => write!(f, "env:{}={}", name, path.display()),
            ValueSource::System(path) => write!(f, "system:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file from `--config`
    pub config_path: Option<PathBuf>,
    /// Base preset from `--preset`
    pub preset: Option<Preset>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file override.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set the preset override.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }
}

/// Path of the system config file, if a config directory can be determined.
pub fn system_config_path() -> Option<PathBuf> {
    system_config_path_with_env(|name| std::env::var(name).ok())
}

fn system_config_path_with_env(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    match env(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir).join(CONFIG_FILE_NAME)),
        None => dirs::config_dir().map(|dir| dir.join("pulsenet").join(CONFIG_FILE_NAME)),
    }
}

/// Read, parse and validate a KDL config file.
pub fn load_config_file(path: &Path, preset: Option<Preset>) -> Result<RendererConfig> {
    let text = fs::read_to_string(path)?;
    let doc: KdlDocument = text.parse()?;
    let config = RendererConfig::from_kdl_with_preset(&doc, preset);
    config
        .validate()
        .map_err(|msg| Error::InvalidConfig(format!("{}: {}", path.display(), msg)))?;
    Ok(config)
}

/// Resolve the renderer configuration with full precedence chain.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<Resolved<RendererConfig>> {
    resolve_config_with_env(overrides, |name| std::env::var(name).ok())
}

/// Resolve the renderer configuration, reading environment variables through `env`.
pub fn resolve_config_with_env(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Resolved<RendererConfig>> {
    if let Some(ref path) = overrides.config_path {
        let config = load_config_file(path, overrides.preset)?;
        return Ok(Resolved::new(config, ValueSource::CliFlag(path.clone())));
    }

    if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        let config = load_config_file(&path, overrides.preset)?;
        return Ok(Resolved::new(
            config,
            ValueSource::EnvVar(CONFIG_ENV.to_string(), path),
        ));
    }

    if let Some(path) = system_config_path_with_env(&env) {
        if path.is_file() {
            let config = load_config_file(&path, overrides.preset)?;
            tracing::debug!(path = %path.display(), "loaded system config");
            return Ok(Resolved::new(config, ValueSource::System(path)));
        }
    }

    let preset = overrides.preset.unwrap_or_default();
    Ok(Resolved::new(preset.config(), ValueSource::Default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // ==================== ValueSource Tests ====================

    #[test]
    fn test_value_source_display() {
        assert_eq!(
            format!("{}", ValueSource::CliFlag(PathBuf::from("/a.kdl"))),
            "cli:/a.kdl"
        );
        assert_eq!(
            format!(
                "{}",
                ValueSource::EnvVar("PULSENET_CONFIG".to_string(), PathBuf::from("/b.kdl"))
            ),
            "env:PULSENET_CONFIG=/b.kdl"
        );
        assert_eq!(format!("{}", ValueSource::Default), "default");
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_resolve_defaults() {
        let empty = TempDir::new().unwrap();
        let dir = empty.path().to_string_lossy().to_string();
        let resolved =
            resolve_config_with_env(&ConfigOverrides::new(), env_from(&[(CONFIG_DIR_ENV, &dir)]))
                .unwrap();
        assert_eq!(resolved.source, ValueSource::Default);
        assert_eq!(resolved.value, RendererConfig::neon());
    }

    #[test]
    fn test_resolve_default_preset_override() {
        let empty = TempDir::new().unwrap();
        let dir = empty.path().to_string_lossy().to_string();
        let overrides = ConfigOverrides::new().with_preset(Preset::Classic);
        let resolved =
            resolve_config_with_env(&overrides, env_from(&[(CONFIG_DIR_ENV, &dir)])).unwrap();
        assert_eq!(resolved.value, RendererConfig::classic());
    }

    #[test]
    fn test_resolve_system_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), CONFIG_FILE_NAME, "layers 3\n");
        let dir = temp.path().to_string_lossy().to_string();

        let resolved =
            resolve_config_with_env(&ConfigOverrides::new(), env_from(&[(CONFIG_DIR_ENV, &dir)]))
                .unwrap();
        assert_eq!(resolved.value.layers, 3);
        assert!(matches!(resolved.source, ValueSource::System(_)));
    }

    #[test]
    fn test_resolve_env_beats_system() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), CONFIG_FILE_NAME, "layers 3\n");
        let env_file = write_config(temp.path(), "env.kdl", "layers 5\n");
        let dir = temp.path().to_string_lossy().to_string();
        let env_path = env_file.to_string_lossy().to_string();

        let resolved = resolve_config_with_env(
            &ConfigOverrides::new(),
            env_from(&[(CONFIG_DIR_ENV, &dir), (CONFIG_ENV, &env_path)]),
        )
        .unwrap();
        assert_eq!(resolved.value.layers, 5);
        assert!(matches!(resolved.source, ValueSource::EnvVar(_, _)));
    }

    #[test]
    fn test_resolve_cli_beats_env() {
        let temp = TempDir::new().unwrap();
        let env_file = write_config(temp.path(), "env.kdl", "layers 5\n");
        let cli_file = write_config(temp.path(), "cli.kdl", "layers 9\n");
        let env_path = env_file.to_string_lossy().to_string();

        let overrides = ConfigOverrides::new().with_config_path(&cli_file);
        let resolved =
            resolve_config_with_env(&overrides, env_from(&[(CONFIG_ENV, &env_path)])).unwrap();
        assert_eq!(resolved.value.layers, 9);
        assert_eq!(resolved.source, ValueSource::CliFlag(cli_file));
    }

    #[test]
    fn test_resolve_missing_explicit_file_is_error() {
        let overrides = ConfigOverrides::new().with_config_path("/nonexistent/pulsenet.kdl");
        let result = resolve_config_with_env(&overrides, env_from(&[]));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_resolve_invalid_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "bad.kdl", "connection-density 3.0\n");
        let overrides = ConfigOverrides::new().with_config_path(&path);
        let result = resolve_config_with_env(&overrides, env_from(&[]));
        match result {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("connection-density")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unparseable_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "broken.kdl", "layers {{{\n");
        let overrides = ConfigOverrides::new().with_config_path(&path);
        let result = resolve_config_with_env(&overrides, env_from(&[]));
        assert!(matches!(result, Err(Error::Kdl(_))));
    }
}
