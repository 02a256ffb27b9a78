//! dirwatcher - polls a directory of text files for a magic string
//!
//! Each tracked file is scanned incrementally from the byte offset where the
//! previous cycle stopped, so every completed line containing the marker is
//! reported exactly once while the files keep growing.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, ConfigWarning};
pub use error::{ConfigError, ScanError, WatchError, WatchResult};
pub use lifecycle::StopSignal;
pub use watcher::{
    CycleOutcome, LineMatch, LineScanner, LoopState, PollLoop, Reconciliation, RunSummary,
    ScanOutcome, TrackedFile, WatchEvent, WatchOptions, WatchSet,
};
