#![no_main]

use std::io::Write;

use dirwatcher::{LineScanner, TrackedFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());

    let mut file = match tempfile::NamedTempFile::new() {
        Ok(file) => file,
        Err(_) => return,
    };
    let scanner = LineScanner::new("FOO");

    // Two appends: arbitrary bytes must never panic or move the offset backwards
    let _ = file.write_all(&rest[..split]);
    let first = scanner
        .scan(&TrackedFile::new(file.path().to_path_buf()))
        .unwrap();

    let _ = file.write_all(&rest[split..]);
    let second = scanner.scan(&first.track).unwrap();

    assert!(second.track.resume_offset >= first.track.resume_offset);
    assert!(second.track.resume_offset <= rest.len() as u64);
});
