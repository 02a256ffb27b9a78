//! Process lifecycle: stop requests, signal trapping and banners
//!
//! The polling loop never gets cancelled from outside. Signal handlers only
//! flip a [`StopSignal`], and the loop checks it between cycles, between
//! files and while sleeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Longest uninterrupted sleep while waiting for the next cycle
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative stop request shared between the signal thread and the loop
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop at its next checkpoint
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, returning early once a stop is requested.
    ///
    /// Returns `true` if the full duration elapsed.
    /// A duration past the clock's range sleeps until stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_stopped() {
                return false;
            }
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => SLEEP_SLICE,
            };
            if remaining.is_zero() {
                return true;
            }
            std::thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}

/// Trap SIGINT and SIGTERM and turn them into a stop request.
#[cfg(unix)]
pub fn install_signal_handlers(stop: StopSignal) -> std::io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        for sig in signals.forever() {
            tracing::warn!("Received {}", signal_name(sig));
            stop.request_stop();
        }
    });
    Ok(())
}

/// Trap Ctrl+C and turn it into a stop request.
#[cfg(not(unix))]
pub fn install_signal_handlers(stop: StopSignal) -> std::io::Result<()> {
    ctrlc::set_handler(move || {
        tracing::warn!("Received SIGINT");
        stop.request_stop();
    })
    .map_err(std::io::Error::other)
}

#[cfg(unix)]
fn signal_name(sig: i32) -> &'static str {
    match sig {
        signal_hook::consts::SIGINT => "SIGINT",
        signal_hook::consts::SIGTERM => "SIGTERM",
        _ => "signal",
    }
}

/// Banner logged when the watcher starts
pub fn render_start_banner(program: &str, pid: u32, started: DateTime<Local>) -> String {
    banner(&[
        format!("Running {program}"),
        format!("PID is {pid}"),
        format!("Started on {}", started.to_rfc3339()),
    ])
}

/// Banner logged when the watcher stops
pub fn render_stop_banner(program: &str, uptime: Duration) -> String {
    banner(&[
        format!("Stopped {program}"),
        format!("Uptime was {}", format_uptime(uptime)),
    ])
}

fn banner(lines: &[String]) -> String {
    let rule = "-".repeat(52);
    let mut out = format!("\n{rule}\n");
    for line in lines {
        out.push_str("   ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// `H:MM:SS.mmm`
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        uptime.subsec_millis()
    )
}
