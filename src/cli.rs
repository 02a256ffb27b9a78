use std::path::PathBuf;

use clap::Parser;
use dirwatcher::Config;

/// dirwatcher - watch a directory of text files for a magic string
#[derive(Parser, Debug)]
#[command(name = "dirwatcher")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Send SIGINT (Ctrl+C) or SIGTERM to stop watching.")]
pub struct Cli {
    /// Directory to monitor
    pub directory: PathBuf,

    /// The magic text to watch for
    #[arg(value_name = "MAGIC")]
    pub magic: String,

    /// Seconds between directory scans
    #[arg(short, long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Only watch files whose names end with this
    #[arg(short = 'x', long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Extra seconds to wait after a cycle that found the directory missing
    #[arg(long, value_name = "SECONDS")]
    pub backoff: Option<f64>,

    /// Read at most this many bytes per file per cycle
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<u64>,

    /// Config file (defaults to ~/.config/dirwatcher/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also append log lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Output events as NDJSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// CLI flags override every other configuration layer
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.watch.interval = interval;
        }
        if let Some(extension) = &self.extension {
            config.watch.extension = extension.clone();
        }
        if let Some(backoff) = self.backoff {
            config.watch.backoff = backoff;
        }
        if let Some(max_bytes) = self.max_bytes {
            config.watch.max_bytes_per_scan = Some(max_bytes);
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = Some(log_file.clone());
        }
    }
}
