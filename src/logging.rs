//! Log sink setup
//!
//! Every watch event ends up as one timestamped `tracing` line on stderr,
//! and optionally in an append-only log file as well.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::watcher::WatchEvent;

/// Logging configuration for the binary
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Number of `-v` flags
    pub verbose: u8,
    /// Also append to this file
    pub file: Option<PathBuf>,
    /// Colorize stderr output
    pub ansi: bool,
}

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "dirwatcher=info",
        1 => "dirwatcher=debug",
        _ => "dirwatcher=trace",
    }
}

/// Initialize tracing with stderr output and an optional file writer.
pub fn init_logging(options: &LogOptions) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(options.verbose)))
    };

    let file_layer = match &options.file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(options.ansi)
                .with_filter(filter()),
        )
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

/// Emit a watch event as a structured log line
pub fn log_event(event: &WatchEvent) {
    match event {
        WatchEvent::WatchStarted {
            directory,
            extension,
            marker,
            interval_secs,
        } => tracing::info!(
            directory = %directory,
            extension = %extension,
            interval = interval_secs,
            magic = %marker,
            "Watching directory"
        ),
        WatchEvent::FileAdded { file } => {
            tracing::info!(file = %file, "{file} added to watchlist")
        }
        WatchEvent::FileRemoved { file } => {
            tracing::info!(file = %file, "{file} removed from watchlist")
        }
        WatchEvent::MatchFound { file, line, text } => tracing::info!(
            file = %file,
            line,
            text = %text,
            "Match found on line {line} in {file}"
        ),
        WatchEvent::FileTruncated {
            file,
            previous_offset,
        } => tracing::warn!(
            file = %file,
            previous_offset,
            "{file} shrank, rescanning from the start"
        ),
        WatchEvent::DirectoryUnavailable { directory } => {
            tracing::error!(directory = %directory, "Directory not found: {directory}")
        }
        WatchEvent::DirectoryError { directory, message } => {
            tracing::error!(directory = %directory, "{message}")
        }
        WatchEvent::ScanError {
            file,
            kind,
            message,
        } => tracing::warn!(file = %file, kind = %kind, "{message}"),
        WatchEvent::UnhandledFault { message } => {
            tracing::error!("UNHANDLED FAULT: {message}")
        }
        WatchEvent::Shutdown { cycles } => tracing::info!(cycles, "Watch stopped"),
    }
}
