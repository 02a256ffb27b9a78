//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::loader::{self, ConfigWarning};

/// Upper bound for `interval` and `backoff`, in seconds (one day)
pub const MAX_DELAY_SECS: f64 = 86_400.0;

/// Polling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Seconds between polling cycles
    #[serde(default = "default_interval")]
    pub interval: f64,

    /// Only file names ending with this are watched
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Extra seconds to wait after a cycle that found the directory missing
    #[serde(default = "default_backoff")]
    pub backoff: f64,

    /// Per-file, per-cycle read budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes_per_scan: Option<u64>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            extension: default_extension(),
            backoff: default_backoff(),
            max_bytes_per_scan: None,
        }
    }
}

fn default_interval() -> f64 {
    1.0
}

fn default_extension() -> String {
    ".txt".to_string()
}

fn default_backoff() -> f64 {
    2.0
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LogConfig {
    /// Also append log lines to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and return non-fatal warnings (unknown keys)
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Reject values the polling loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let watch = &self.watch;
        if !watch.interval.is_finite() || watch.interval <= 0.0 || watch.interval > MAX_DELAY_SECS
        {
            return Err(ConfigError::InvalidInterval(watch.interval));
        }
        if !watch.backoff.is_finite() || watch.backoff < 0.0 || watch.backoff > MAX_DELAY_SECS {
            return Err(ConfigError::InvalidBackoff(watch.backoff));
        }
        if watch.max_bytes_per_scan == Some(0) {
            return Err(ConfigError::InvalidMaxBytes);
        }
        Ok(())
    }
}

/// The marker is supplied on the command line, not in config files
pub fn validate_marker(marker: &str) -> Result<(), ConfigError> {
    if marker.is_empty() {
        return Err(ConfigError::EmptyMarker);
    }
    Ok(())
}
