//! Property tests for incremental line scanning.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use proptest::prelude::*;

use dirwatcher::{LineMatch, LineScanner, TrackedFile};

const MARKER: &str = "FOO";

fn log_line() -> impl Strategy<Value = String> {
    // Printable words with the occasional marker, never a newline.
    proptest::string::string_regex("[a-z ]{0,12}(FOO)?[a-z ]{0,12}").unwrap()
}

fn log_body() -> impl Strategy<Value = String> {
    proptest::collection::vec(log_line(), 0..=12).prop_map(|lines| {
        lines.iter().map(|line| format!("{line}\n")).collect::<String>()
    })
}

/// Split `body` into consecutive chunks at the given cut points.
fn chunks(body: &str, cuts: &[usize]) -> Vec<String> {
    let bytes = body.as_bytes();
    let mut points: Vec<usize> = cuts
        .iter()
        .map(|c| if bytes.is_empty() { 0 } else { c % (bytes.len() + 1) })
        .collect();
    points.push(0);
    points.push(bytes.len());
    points.sort_unstable();
    points.dedup();

    points
        .windows(2)
        .map(|w| String::from_utf8_lossy(&bytes[w[0]..w[1]]).into_owned())
        .collect()
}

fn append(path: &Path, content: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

/// Every marker line in `body`, numbered from 1
fn expected_matches(body: &str) -> Vec<LineMatch> {
    body.lines()
        .enumerate()
        .filter(|(_, text)| text.contains(MARKER))
        .map(|(i, text)| LineMatch {
            line: i as u64 + 1,
            text: text.to_string(),
        })
        .collect()
}

/// Number of the line that starts at byte `offset`
fn line_at(body: &str, offset: u64) -> u64 {
    body.as_bytes()[..offset as usize]
        .iter()
        .filter(|b| **b == b'\n')
        .count() as u64
        + 1
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Chunked appends report each marker line once, in order.
    #[test]
    fn property_no_miss_no_duplicate(
        body in log_body(),
        cuts in proptest::collection::vec(any::<usize>(), 0..=6),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        append(&path, "");

        let scanner = LineScanner::new(MARKER);
        let mut track = TrackedFile::new(path.clone());
        let mut reported = Vec::new();
        let mut written = String::new();

        for chunk in chunks(&body, &cuts) {
            append(&path, &chunk);
            written.push_str(&chunk);

            let outcome = scanner.scan(&track).unwrap();
            prop_assert!(!outcome.truncated);
            prop_assert!(outcome.track.resume_offset >= track.resume_offset);

            track = outcome.track;
            reported.extend(outcome.matches);

            // Offset always sits just past the last complete line.
            let expected_offset = written.rfind('\n').map_or(0, |i| i as u64 + 1);
            prop_assert_eq!(track.resume_offset, expected_offset);
            prop_assert_eq!(track.resume_line, line_at(&written, track.resume_offset));
            prop_assert_eq!(track.pending_partial, !written.ends_with('\n') && !written.is_empty());
        }

        prop_assert_eq!(reported, expected_matches(&body));
    }

    /// PROPERTY: A byte budget only delays reports, never changes them.
    #[test]
    fn property_budget_converges_to_unbounded_scan(
        body in log_body(),
        budget in 1u64..=64,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        append(&path, &body);

        let scanner = LineScanner::new(MARKER).with_budget(Some(budget));
        let mut track = TrackedFile::new(path.clone());
        let mut reported = Vec::new();

        // Every scan consumes at least one complete line until the end.
        for _ in 0..=body.len() {
            let outcome = scanner.scan(&track).unwrap();
            let done = outcome.bytes_read == 0;
            track = outcome.track;
            reported.extend(outcome.matches);
            if done {
                break;
            }
        }

        prop_assert_eq!(track.resume_offset, body.len() as u64);
        prop_assert_eq!(reported, expected_matches(&body));
    }

    /// PROPERTY: Truncation rewinds and rescans the new content from line 1.
    #[test]
    fn property_truncation_rescans_from_start(
        before in log_body(),
        after in log_body(),
    ) {
        prop_assume!(after.len() < before.len());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, &before).unwrap();

        let scanner = LineScanner::new(MARKER);
        let first = scanner.scan(&TrackedFile::new(path.clone())).unwrap();

        std::fs::write(&path, &after).unwrap();
        let second = scanner.scan(&first.track).unwrap();

        prop_assert!(second.truncated);
        prop_assert_eq!(second.matches, expected_matches(&after));
        prop_assert_eq!(second.track.resume_offset, after.len() as u64);
    }
}
