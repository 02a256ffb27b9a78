//! dirwatcher CLI - watch a directory of text files for a magic string
//!
//! Usage: dirwatcher [OPTIONS] <DIRECTORY> <MAGIC>
//!
//! Polls DIRECTORY every `--interval` seconds and logs every new line that
//! contains MAGIC in files ending with `--extension`. Runs until SIGINT or
//! SIGTERM.

mod cli;

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;

use dirwatcher::config::{self, validate_marker};
use dirwatcher::lifecycle::{self, StopSignal};
use dirwatcher::logging::{self, LogOptions};
use dirwatcher::{PollLoop, WatchEvent, WatchOptions};

use crate::cli::Cli;

const PROGRAM: &str = env!("CARGO_PKG_NAME");

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, warnings) = config::resolve(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    validate_marker(&cli.magic)?;

    logging::init_logging(&LogOptions {
        verbose: cli.verbose,
        file: config.log.file.clone(),
        ansi: std::io::stderr().is_terminal(),
    })?;

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let directory = std::fs::canonicalize(&cli.directory)
        .or_else(|_| std::path::absolute(&cli.directory))
        .unwrap_or_else(|_| cli.directory.clone());
    let options = WatchOptions::from_config(directory, cli.magic.clone(), &config);

    let stop = StopSignal::new();
    lifecycle::install_signal_handlers(stop.clone())
        .context("Failed to install signal handlers")?;

    let started_at = chrono::Local::now();
    let clock = Instant::now();
    tracing::info!(
        "{}",
        lifecycle::render_start_banner(PROGRAM, std::process::id(), started_at)
    );

    let json = cli.json;
    let summary = PollLoop::new(options).run(&stop, |event| emit(&event, json));

    tracing::info!(
        cycles = summary.cycles,
        matches = summary.matches,
        "{}",
        lifecycle::render_stop_banner(PROGRAM, clock.elapsed())
    );

    Ok(())
}

fn emit(event: &WatchEvent, json: bool) {
    if !json {
        logging::log_event(event);
        return;
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", event.to_json()).and_then(|_| stdout.flush()) {
        tracing::warn!("Failed to write {} event to stdout: {e}", event.name());
    }
}
