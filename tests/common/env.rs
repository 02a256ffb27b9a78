//! Isolated watch environment for scenario and CLI tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dirwatcher::WatchEvent;
use tempfile::TempDir;

/// Temp root containing the watched directory at `<root>/watched`
pub struct WatchDir {
    root: TempDir,
}

impl WatchDir {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("watched")).unwrap();
        Self { root }
    }

    /// The watched directory
    pub fn path(&self) -> PathBuf {
        self.root.path().join("watched")
    }

    /// Path of a file inside the watched directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.file(name), content).unwrap();
    }

    pub fn append(&self, name: &str, content: &str) {
        append(&self.file(name), content);
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.file(name)).unwrap();
    }

    pub fn remove_dir(&self) {
        fs::remove_dir_all(self.path()).unwrap();
    }

    pub fn recreate_dir(&self) {
        fs::create_dir_all(self.path()).unwrap();
    }
}

pub fn append(path: &Path, content: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

/// Thread-safe collector for watch events
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<WatchEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: WatchEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Take everything collected so far
    pub fn drain(&self) -> Vec<WatchEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn snapshot(&self) -> Vec<WatchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Poll until `predicate` holds for the collected events or `timeout` passes
    pub fn wait_for<P>(&self, timeout: Duration, predicate: P) -> bool
    where
        P: Fn(&[WatchEvent]) -> bool,
    {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if predicate(&self.events.lock().unwrap()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }
}

/// (line, text) of every match event
pub fn matches_of(events: &[WatchEvent]) -> Vec<(u64, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            WatchEvent::MatchFound { line, text, .. } => Some((*line, text.clone())),
            _ => None,
        })
        .collect()
}
