//! Scenario: a single log file is created, appended to, and deleted.

use std::time::Duration;

use dirwatcher::{CycleOutcome, PollLoop, StopSignal, WatchEvent, WatchOptions};

use crate::common::*;

fn poll_loop(dir: &WatchDir) -> PollLoop {
    PollLoop::new(
        WatchOptions::new(dir.path(), MAGIC).with_interval(Duration::from_millis(10)),
    )
}

fn cycle(poll: &mut PollLoop, log: &EventLog) -> CycleOutcome {
    poll.run_cycle(&StopSignal::new(), &|event| log.push(event))
}

#[test]
fn scenario_file_grows_across_cycles() {
    let dir = WatchDir::new();
    let log = EventLog::new();
    let mut poll = poll_loop(&dir);

    // Cycle 1: empty file is picked up, nothing to report yet
    dir.write("a.txt", "");
    cycle(&mut poll, &log);
    assert_eq!(
        log.drain(),
        vec![WatchEvent::FileAdded {
            file: "a.txt".to_string()
        }]
    );
    assert_eq!(poll.watch_set().get("a.txt").unwrap().resume_offset, 0);

    // Cycle 2: a complete marker line
    dir.append("a.txt", "start FOO end\n");
    cycle(&mut poll, &log);
    assert_eq!(matches_of(&log.drain()), vec![(1, "start FOO end".to_string())]);
    let track = poll.watch_set().get("a.txt").unwrap();
    assert_eq!(track.resume_offset, 14);
    assert_eq!(track.resume_line, 2);

    // Cycle 3: marker split across an unterminated line
    dir.append("a.txt", "partial FO");
    cycle(&mut poll, &log);
    assert!(log.drain().is_empty());
    let track = poll.watch_set().get("a.txt").unwrap();
    assert!(track.pending_partial);
    assert_eq!(track.resume_offset, 14);

    // Cycle 4: line completed, reported exactly once
    dir.append("a.txt", "O end\n");
    cycle(&mut poll, &log);
    assert_eq!(
        matches_of(&log.drain()),
        vec![(2, "partial FOO end".to_string())]
    );

    // Cycle 5: nothing new, nothing reported
    cycle(&mut poll, &log);
    assert!(log.drain().is_empty());

    // Cycle 6: file deleted
    dir.remove("a.txt");
    cycle(&mut poll, &log);
    assert_eq!(
        log.drain(),
        vec![WatchEvent::FileRemoved {
            file: "a.txt".to_string()
        }]
    );
    assert!(poll.watch_set().is_empty());

    // Cycle 7: no further scan attempts on it
    cycle(&mut poll, &log);
    assert!(log.drain().is_empty());
}

#[test]
fn scenario_existing_content_is_reported_on_first_scan() {
    let dir = WatchDir::new();
    let log = EventLog::new();
    let mut poll = poll_loop(&dir);

    dir.write("app.txt", LOG_WITH_TWO_MATCHES);
    dir.write("quiet.txt", QUIET_LOG);
    dir.write("ignored.log", LOG_WITH_TWO_MATCHES);
    cycle(&mut poll, &log);

    let events = log.drain();
    assert_eq!(
        matches_of(&events),
        vec![
            (2, "disk check FOO failed".to_string()),
            (4, "FOO: giving up".to_string()),
        ]
    );
    assert_eq!(poll.watch_set().tracked_names(), vec!["app.txt", "quiet.txt"]);
}

#[test]
fn scenario_rotated_file_is_rescanned_from_top() {
    let dir = WatchDir::new();
    let log = EventLog::new();
    let mut poll = poll_loop(&dir);

    dir.write("a.txt", LOG_WITH_TWO_MATCHES);
    cycle(&mut poll, &log);
    log.drain();

    // Rotation: file replaced by shorter content
    dir.write("a.txt", "FOO again\n");
    cycle(&mut poll, &log);

    let events = log.drain();
    assert!(matches!(events[0], WatchEvent::FileTruncated { .. }));
    assert_eq!(matches_of(&events), vec![(1, "FOO again".to_string())]);
}

#[test]
fn scenario_custom_extension_filter() {
    let dir = WatchDir::new();
    let log = EventLog::new();
    let mut poll = PollLoop::new(WatchOptions::new(dir.path(), MAGIC).with_extension(".log"));

    dir.write("a.txt", "FOO\n");
    dir.write("b.log", "FOO\n");
    cycle(&mut poll, &log);

    assert_eq!(poll.watch_set().tracked_names(), vec!["b.log"]);
    assert_eq!(matches_of(&log.drain()).len(), 1);
}
