//! Configuration file parser for ~/.config/tidings/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! All keys have defaults, so any subset can be specified.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::feed::DEFAULT_MAX_BODY_BYTES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Cap on feed response bodies, in bytes.
    pub max_body_bytes: usize,

    /// User-Agent header sent with feed requests.
    pub user_agent: String,

    /// How many feeds the `refresh` command reconciles at once.
    pub refresh_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: concat!("tidings/", env!("CARGO_PKG_VERSION")).to_string(),
            refresh_concurrency: 4,
        }
    }
}

impl Config {
    /// Load configuration from `path`; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
