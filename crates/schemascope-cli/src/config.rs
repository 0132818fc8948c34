//! Configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Strategy used when neither the flag nor the config names one
pub const DEFAULT_STRATEGY: &str = "basic";

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

/// A named connection profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection profile used when --connection is not given
    pub default_connection: Option<String>,
    /// Strategy used when --strategy is not given
    pub default_strategy: Option<String>,
    /// Named connection profiles
    #[serde(default)]
    pub connections: HashMap<String, ConnectionProfile>,
}

impl Config {
    /// Load configuration from the given path, or the per-user config
    /// location. A missing file yields the default (empty) configuration.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON at {:?}", path))
    }
}

/// Per-user config file location
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("schemascope").join("config.json"))
}
