//! Configuration file discovery and loading
//!
//! Effective settings are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file (searched in standard locations)
//! 4. Built-in defaults

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Describes where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit path provided via CLI or env var
    Explicit(PathBuf),
    /// Found in current working directory
    CurrentDir(PathBuf),
    /// Found in XDG config home (~/.config/climate-api/)
    XdgConfig(PathBuf),
    /// Found in system config (/etc/climate-api/)
    System(PathBuf),
    /// No config file found, using defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p.as_path()),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find a configuration file in standard locations
///
/// Search order:
/// 1. Environment variable (e.g., CLIMATE_API_CONFIG)
/// 2. Current directory (climate.toml)
/// 3. XDG config home ($XDG_CONFIG_HOME/climate-api/ or ~/.config/climate-api/)
/// 4. System config (/etc/climate-api/)
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Some(explicit) = env::var_os(env_var).map(PathBuf::from) {
        if explicit.exists() {
            return ConfigSource::Explicit(explicit);
        }
    }

    let local = PathBuf::from(filename);
    if local.exists() {
        return ConfigSource::CurrentDir(local);
    }

    let xdg_path = xdg_config_dir().join(filename);
    if xdg_path.exists() {
        return ConfigSource::XdgConfig(xdg_path);
    }

    let system = Path::new("/etc").join(APP_NAME).join(filename);
    if system.exists() {
        return ConfigSource::System(system);
    }

    ConfigSource::Defaults
}

fn xdg_config_dir() -> PathBuf {
    match (env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME")) {
        (Some(xdg_config), _) => PathBuf::from(xdg_config).join(APP_NAME),
        (None, Some(home)) => PathBuf::from(home).join(".config").join(APP_NAME),
        (None, None) => Path::new(".config").join(APP_NAME),
    }
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when `source` is [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
