//! Directory watcher for magic text
//!
//! Implements the polling loop with:
//! - Watchlist reconciliation against each directory listing
//! - Incremental per-file scanning from a saved byte offset
//! - Deferred reporting of lines that are still being written
//! - Graceful stop between cycles and between files

mod event;
mod poll_loop;
mod scanner;
mod watch_set;

pub use event::{WatchEvent, WatchOptions};
pub use poll_loop::{CycleOutcome, LoopState, PollLoop, RunSummary};
pub use scanner::{LineMatch, LineScanner, ScanOutcome};
pub use watch_set::{Reconciliation, TrackedFile, WatchSet};
