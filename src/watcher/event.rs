//! Watch event types and options

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, MAX_DELAY_SECS};

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory to poll
    pub directory: PathBuf,
    /// Literal text to search for
    pub marker: String,
    /// Only file names ending with this are tracked
    pub extension: String,
    /// Delay between cycles
    pub interval: Duration,
    /// Extra delay after a cycle that found the directory missing
    pub backoff: Duration,
    /// Per-file, per-cycle read budget in bytes
    pub max_bytes_per_scan: Option<u64>,
}

impl WatchOptions {
    /// Create new watch options with default timing and extension
    pub fn new(directory: PathBuf, marker: impl Into<String>) -> Self {
        Self::from_config(directory, marker, &Config::default())
    }

    /// Create watch options from a resolved config
    pub fn from_config(directory: PathBuf, marker: impl Into<String>, config: &Config) -> Self {
        Self {
            directory,
            marker: marker.into(),
            extension: config.watch.extension.clone(),
            interval: delay_from_secs(config.watch.interval),
            backoff: delay_from_secs(config.watch.backoff),
            max_bytes_per_scan: config.watch.max_bytes_per_scan,
        }
    }

    /// Set the extension filter
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the polling interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the missing-directory backoff
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the per-scan byte budget
    pub fn with_max_bytes_per_scan(mut self, bytes: Option<u64>) -> Self {
        self.max_bytes_per_scan = bytes;
        self
    }
}

/// Seconds to a delay, clamped to `0..=MAX_DELAY_SECS` (NaN becomes zero)
fn delay_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.clamp(0.0, MAX_DELAY_SECS)).unwrap_or(Duration::ZERO)
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Polling loop started
    WatchStarted {
        directory: String,
        extension: String,
        marker: String,
        interval_secs: f64,
    },
    /// File joined the watchlist
    FileAdded { file: String },
    /// File left the watchlist
    FileRemoved { file: String },
    /// Completed line containing the marker
    MatchFound {
        file: String,
        line: u64,
        text: String,
    },
    /// File shrank below its resume offset and is rescanned from the top
    FileTruncated { file: String, previous_offset: u64 },
    /// Watched directory is missing
    DirectoryUnavailable { directory: String },
    /// Watched directory could not be listed
    DirectoryError { directory: String, message: String },
    /// A single file could not be scanned this cycle
    ScanError {
        file: String,
        kind: String,
        message: String,
    },
    /// A cycle panicked and was abandoned
    UnhandledFault { message: String },
    /// Polling loop stopped
    Shutdown { cycles: u64 },
}

impl WatchEvent {
    /// Convert to JSON string with "command" and "timestamp" fields included
    pub fn to_json(&self) -> String {
        self.to_json_at(&chrono::Local::now().to_rfc3339())
    }

    /// Convert to JSON with a caller-supplied timestamp
    pub fn to_json_at(&self, timestamp: &str) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
            obj.insert("timestamp".to_string(), serde_json::json!(timestamp));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Name used as the `event` tag
    pub fn name(&self) -> &'static str {
        match self {
            WatchEvent::WatchStarted { .. } => "watch_started",
            WatchEvent::FileAdded { .. } => "file_added",
            WatchEvent::FileRemoved { .. } => "file_removed",
            WatchEvent::MatchFound { .. } => "match_found",
            WatchEvent::FileTruncated { .. } => "file_truncated",
            WatchEvent::DirectoryUnavailable { .. } => "directory_unavailable",
            WatchEvent::DirectoryError { .. } => "directory_error",
            WatchEvent::ScanError { .. } => "scan_error",
            WatchEvent::UnhandledFault { .. } => "unhandled_fault",
            WatchEvent::Shutdown { .. } => "shutdown",
        }
    }

    /// Whether this event reports a problem
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            WatchEvent::DirectoryUnavailable { .. }
                | WatchEvent::DirectoryError { .. }
                | WatchEvent::ScanError { .. }
                | WatchEvent::UnhandledFault { .. }
        )
    }
}
