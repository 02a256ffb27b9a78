//! Polling loop: reconcile, scan, sleep, repeat until asked to stop

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::error::{WatchError, WatchResult};
use crate::lifecycle::StopSignal;

use super::event::{WatchEvent, WatchOptions};
use super::scanner::LineScanner;
use super::watch_set::WatchSet;

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What a single cycle managed to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Directory listed and tracked files scanned
    Completed {
        files_scanned: usize,
        matches: usize,
        /// Stop requested before every file was scanned
        interrupted: bool,
    },
    /// Directory missing; the next cycle waits for the backoff too
    DirectoryUnavailable,
    /// Directory could not be listed for another reason
    DirectoryError,
    /// Cycle panicked and was abandoned
    Faulted,
}

/// Totals reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub matches: u64,
}

/// Drives polling cycles over one directory.
///
/// Owns the [`WatchSet`] outright; cycles run strictly one after another on
/// the calling thread.
#[derive(Debug)]
pub struct PollLoop {
    options: WatchOptions,
    scanner: LineScanner,
    watch_set: WatchSet,
    state: LoopState,
    summary: RunSummary,
}

impl PollLoop {
    pub fn new(options: WatchOptions) -> Self {
        let scanner =
            LineScanner::new(options.marker.clone()).with_budget(options.max_bytes_per_scan);
        let watch_set = WatchSet::new(options.directory.clone());
        Self {
            options,
            scanner,
            watch_set,
            state: LoopState::Running,
            summary: RunSummary::default(),
        }
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run cycles until `stop` is requested (blocking).
    ///
    /// A cycle that panics is reported as [`WatchEvent::UnhandledFault`] and
    /// the loop carries on; only the stop request ends it.
    pub fn run<F>(&mut self, stop: &StopSignal, on_event: F) -> RunSummary
    where
        F: Fn(WatchEvent),
    {
        on_event(WatchEvent::WatchStarted {
            directory: self.options.directory.display().to_string(),
            extension: self.options.extension.clone(),
            marker: self.options.marker.clone(),
            interval_secs: self.options.interval.as_secs_f64(),
        });

        while self.state == LoopState::Running && !stop.is_stopped() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_cycle(stop, &on_event)))
                .unwrap_or_else(|payload| {
                    on_event(WatchEvent::UnhandledFault {
                        message: panic_message(payload.as_ref()),
                    });
                    CycleOutcome::Faulted
                });

            self.summary.cycles += 1;
            tracing::trace!(cycle = self.summary.cycles, ?outcome, "cycle finished");

            stop.sleep(self.delay_after(&outcome));
        }

        self.state = LoopState::Stopped;
        on_event(WatchEvent::Shutdown {
            cycles: self.summary.cycles,
        });
        self.summary
    }

    /// Time to wait before the cycle following `outcome`
    pub fn delay_after(&self, outcome: &CycleOutcome) -> Duration {
        match outcome {
            CycleOutcome::DirectoryUnavailable => {
                self.options.interval.saturating_add(self.options.backoff)
            }
            _ => self.options.interval,
        }
    }

    /// Execute one reconcile-then-scan cycle.
    pub fn run_cycle<F>(&mut self, stop: &StopSignal, on_event: &F) -> CycleOutcome
    where
        F: Fn(WatchEvent),
    {
        let listing = match self.list_directory() {
            Ok(listing) => listing,
            Err(WatchError::DirectoryUnavailable { path }) => {
                on_event(WatchEvent::DirectoryUnavailable {
                    directory: path.display().to_string(),
                });
                return CycleOutcome::DirectoryUnavailable;
            }
            Err(err @ WatchError::DirectoryRead { .. }) => {
                on_event(WatchEvent::DirectoryError {
                    directory: self.options.directory.display().to_string(),
                    message: err.to_string(),
                });
                return CycleOutcome::DirectoryError;
            }
        };

        let delta = self.watch_set.reconcile(listing.as_slice(), &self.options.extension);
        for file in delta.added {
            on_event(WatchEvent::FileAdded { file });
        }
        for file in delta.removed {
            on_event(WatchEvent::FileRemoved { file });
        }

        let mut files_scanned = 0;
        let mut matches = 0;
        let mut interrupted = false;

        for name in self.watch_set.tracked_names() {
            if stop.is_stopped() {
                interrupted = true;
                break;
            }
            if !name.ends_with(&self.options.extension) {
                continue;
            }
            let Some(track) = self.watch_set.get(&name) else {
                continue;
            };
            let previous_offset = track.resume_offset;
            let result = self.scanner.scan(track);

            match result {
                Ok(outcome) => {
                    files_scanned += 1;
                    tracing::trace!(
                        file = %name,
                        from = previous_offset,
                        to = outcome.track.resume_offset,
                        bytes = outcome.bytes_read,
                        pending_partial = outcome.track.pending_partial,
                        "scanned"
                    );
                    // Progress is saved before any event reaches the sink.
                    let file = outcome.track.path.display().to_string();
                    self.watch_set.update(&name, outcome.track);

                    if outcome.truncated {
                        on_event(WatchEvent::FileTruncated {
                            file: name.clone(),
                            previous_offset,
                        });
                    }
                    for found in outcome.matches {
                        matches += 1;
                        on_event(WatchEvent::MatchFound {
                            file: file.clone(),
                            line: found.line,
                            text: found.text,
                        });
                    }
                }
                Err(err) => {
                    on_event(WatchEvent::ScanError {
                        file: name.clone(),
                        kind: err.kind().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.summary.matches += matches as u64;
        tracing::debug!(
            tracked = self.watch_set.len(),
            files_scanned,
            matches,
            "cycle complete"
        );

        CycleOutcome::Completed {
            files_scanned,
            matches,
            interrupted,
        }
    }

    /// Names of the regular entries in the watched directory
    fn list_directory(&self) -> WatchResult<Vec<String>> {
        let dir = &self.options.directory;
        let entries = fs::read_dir(dir).map_err(|e| WatchError::from_listing(dir.clone(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| WatchError::from_listing(dir.clone(), e))?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::debug!(name = ?raw, "skipping non-UTF-8 file name"),
            }
        }
        Ok(names)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
