//! Configuration file support for gotargets.
//!
//! gotargets reads two optional configuration files:
//! - Global: `config.toml` in the user config directory
//! - Project: `.gotargets.toml` in the current directory
//!
//! Project config takes precedence over global config. An explicit
//! `--config` path replaces both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Name of the per-project config file.
pub const PROJECT_CONFIG_NAME: &str = ".gotargets.toml";

/// gotargets configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,

    /// Listing settings
    pub list: ListConfig,
}

/// Which Go toolchain to resolve platforms for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Go version string, e.g. `go1.16.5`
    pub go_version: Option<String>,
}

/// Defaults for `gotargets list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Only list default build targets
    pub default_only: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.go_version.is_some() {
            self.toolchain.go_version = other.toolchain.go_version;
        }
        if other.list.default_only.is_some() {
            self.list.default_only = other.list.default_only;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (./.gotargets.toml)
/// 2. Global config (<config dir>/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config path (e.g. `~/.config/gotargets/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "gotargets", "gotargets").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path for a directory.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_NAME)
}
