//! Watchlist state and per-cycle reconciliation

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Scan position for one watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Byte offset where the next scan begins
    pub resume_offset: u64,
    /// 1-based line number of the byte at `resume_offset`
    pub resume_line: u64,
    /// Last scan ended on an unterminated line that starts at `resume_offset`
    pub pending_partial: bool,
}

impl TrackedFile {
    /// A file seen for the first time: scanning starts at the top
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            resume_offset: 0,
            resume_line: 1,
            pending_partial: false,
        }
    }

    /// Forget all progress (used after truncation)
    pub fn rewound(&self) -> Self {
        Self::new(self.path.clone())
    }
}

/// Names added to and removed from the watchlist by one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Files under observation, keyed by file name within the watched directory
#[derive(Debug)]
pub struct WatchSet {
    root: PathBuf,
    files: HashMap<String, TrackedFile>,
}

impl WatchSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: HashMap::new(),
        }
    }

    /// Directory the tracked names are relative to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bring the watchlist in line with the current directory listing.
    ///
    /// `listing` is the raw, unfiltered set of names in the directory. Names
    /// are added only when they end with `extension`; any tracked name missing
    /// from the listing is removed. Both deltas come back sorted.
    pub fn reconcile<S: AsRef<str>>(&mut self, listing: &[S], extension: &str) -> Reconciliation {
        let mut delta = Reconciliation::default();
        let present: HashSet<&str> = listing.iter().map(|s| s.as_ref()).collect();

        for name in &present {
            let name = *name;
            if name.ends_with(extension) && !self.files.contains_key(name) {
                let tracked = TrackedFile::new(self.root.join(name));
                self.files.insert(name.to_string(), tracked);
                delta.added.push(name.to_string());
            }
        }

        self.files.retain(|name, _| {
            let keep = present.contains(name.as_str());
            if !keep {
                delta.removed.push(name.clone());
            }
            keep
        });

        delta.added.sort();
        delta.removed.sort();
        delta
    }

    pub fn get(&self, name: &str) -> Option<&TrackedFile> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Replace the state of an already tracked file. Unknown names are ignored.
    pub fn update(&mut self, name: &str, tracked: TrackedFile) {
        if let Some(slot) = self.files.get_mut(name) {
            *slot = tracked;
        }
    }

    /// Tracked names in stable order
    pub fn tracked_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TrackedFile)> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
