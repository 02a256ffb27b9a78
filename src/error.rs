//! Error types for dirwatcher
//!
//! Uses `thiserror` for library errors. The binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for directory-level watch operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Directory-level failures raised before reconciliation
#[derive(Error, Debug)]
pub enum WatchError {
    /// Watched directory is missing
    #[error("directory not found: {path}")]
    DirectoryUnavailable { path: PathBuf },

    /// Any other failure while listing the watched directory
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WatchError {
    /// Classify a listing failure for `path`
    pub fn from_listing(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            WatchError::DirectoryUnavailable { path }
        } else {
            WatchError::DirectoryRead { path, source: err }
        }
    }
}

/// Per-file scan failures. Never fatal to a cycle.
#[derive(Error, Debug)]
pub enum ScanError {
    /// File disappeared between the directory listing and the scan
    #[error("file vanished before it could be scanned: {path}")]
    Vanished { path: PathBuf },

    /// Open, seek or read failure on an existing file
    #[error("failed to scan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn from_io(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ScanError::Vanished { path }
        } else {
            ScanError::Io { path, source: err }
        }
    }

    /// Short label used in structured output
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::Vanished { .. } => "vanished",
            ScanError::Io { .. } => "io",
        }
    }
}

/// Startup configuration failures. Fatal before the loop begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("polling interval must be a positive number of seconds up to 86400, got {0}")]
    InvalidInterval(f64),

    #[error("directory backoff must be between 0 and 86400 seconds, got {0}")]
    InvalidBackoff(f64),

    #[error("max bytes per scan must be greater than zero")]
    InvalidMaxBytes,

    #[error("magic text must not be empty")]
    EmptyMarker,

    #[error("failed to read config file {file}: {source}")]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {file}: {message}")]
    Parse { file: PathBuf, message: String },
}
