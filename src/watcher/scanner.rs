//! Incremental line scanner
//!
//! Reads a file forward from a [`TrackedFile`]'s resume position and reports
//! every newly completed line that contains the marker. A trailing line with
//! no `\n` yet is left for the next scan: the resume offset stays at its
//! first byte, so once the writer finishes the line it is examined in full
//! and reported exactly once.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};

use crate::error::ScanError;

use super::watch_set::TrackedFile;

/// A completed line containing the marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based line number within the file
    pub line: u64,
    /// Line content without its terminator
    pub text: String,
}

/// Result of scanning one file once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Updated scan position
    pub track: TrackedFile,
    /// Matches found in lines completed since the previous scan
    pub matches: Vec<LineMatch>,
    /// File had shrunk below the previous resume offset and was rescanned from the top
    pub truncated: bool,
    /// Bytes of complete lines consumed by this scan
    pub bytes_read: u64,
}

/// Scans files for a literal marker, one terminated line at a time
#[derive(Debug, Clone)]
pub struct LineScanner {
    marker: String,
    budget: Option<u64>,
}

impl LineScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            budget: None,
        }
    }

    /// Stop a scan at the first line boundary after `bytes` have been consumed
    pub fn with_budget(mut self, bytes: Option<u64>) -> Self {
        self.budget = bytes;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Scan `track.path` starting at `track.resume_offset`.
    ///
    /// `track` itself is never modified, so on error the caller still holds
    /// the last good position and simply retries next cycle.
    pub fn scan(&self, track: &TrackedFile) -> Result<ScanOutcome, ScanError> {
        let io_err = |e| ScanError::from_io(track.path.clone(), e);

        let file = File::open(&track.path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        let truncated = len < track.resume_offset;
        let mut next = if truncated {
            track.rewound()
        } else {
            track.clone()
        };
        next.pending_partial = false;

        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(next.resume_offset))
            .map_err(io_err)?;

        let mut matches = Vec::new();
        let mut consumed: u64 = 0;
        let mut buf = Vec::new();

        loop {
            if self.budget.is_some_and(|limit| consumed >= limit) {
                break;
            }

            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).map_err(io_err)?;
            if n == 0 {
                break;
            }
            if buf.last() != Some(&b'\n') {
                // Incomplete line: leave the offset at its first byte.
                next.pending_partial = true;
                break;
            }

            let text = line_text(&buf);
            if text.contains(self.marker.as_str()) {
                matches.push(LineMatch {
                    line: next.resume_line,
                    text,
                });
            }

            next.resume_offset += n as u64;
            next.resume_line += 1;
            consumed += n as u64;
        }

        Ok(ScanOutcome {
            track: next,
            matches,
            truncated,
            bytes_read: consumed,
        })
    }
}

fn line_text(raw: &[u8]) -> String {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
