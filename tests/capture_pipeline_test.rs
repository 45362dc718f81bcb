//! Integration tests for the capture pipeline, driven by a manual source

use snapposition::{
    CaptureConfig, CaptureError, EventCapture, ManualHandle, ManualSource, PointerSource,
};
use std::thread;
use std::time::{Duration, Instant};

fn manual_capture() -> (EventCapture<ManualSource>, ManualHandle) {
    let (source, handle) = ManualSource::new();
    (EventCapture::new(source, CaptureConfig::default()), handle)
}

/// Wait until the worker has appended `expected` events.
fn wait_for_count<S: PointerSource>(capture: &EventCapture<S>, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while capture.count() < expected {
        assert!(Instant::now() < deadline, "timed out waiting for {expected} events");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_rate_limited_moves_record_once() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();

    assert!(handle.move_to(300, 300, 2.00));
    assert!(handle.move_to(300, 300, 2.01));
    capture.stop();

    assert_eq!(capture.count(), 1);
    let counts = capture.counters().counts();
    assert_eq!(counts.moves_received, 2);
    assert_eq!(counts.moves_rate_limited, 1);
    assert_eq!(counts.moves_recorded, 1);
}

#[test]
fn test_clicks_bypass_rate_limit_and_releases_are_ignored() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();

    handle.move_to(0, 0, 0.0);
    handle.press(0, 0, 0.01);
    handle.release(0, 0, 0.02);
    handle.press(3, 4, 0.03);
    // A click does not reset the move sampling window.
    handle.move_to(6, 8, 0.06);
    capture.stop();

    let events = capture.snapshot();
    let clicks: Vec<bool> = events.iter().map(|e| e.is_click()).collect();
    assert_eq!(clicks, vec![false, true, true, false]);
    // 5px in 0.02s since the last click.
    assert_eq!(events[2].speed(), 250.0);
    assert_eq!(events[3].speed(), 166.67);
}

#[test]
fn test_nothing_appended_after_stop() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();
    handle.move_to(1, 1, 0.0);
    capture.stop();

    assert!(!handle.move_to(2, 2, 1.0));
    assert!(!handle.press(2, 2, 1.1));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(capture.count(), 1);
}

#[test]
fn test_snapshot_is_independent_and_repeatable() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();
    for i in 0..10 {
        handle.move_to(i * 10, 0, f64::from(i) * 0.1);
    }
    wait_for_count(&capture, 10);

    let first = capture.snapshot();
    let second = capture.snapshot();
    assert_eq!(first, second);

    handle.move_to(500, 500, 5.0);
    wait_for_count(&capture, 11);
    assert_eq!(first.len(), 10);
    capture.stop();
}

#[test]
fn test_snapshots_during_capture_are_prefixes() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();

    let producer = thread::spawn(move || {
        for i in 0..500 {
            handle.move_to(i, i, f64::from(i) * 0.1);
        }
    });

    let mut last_len = 0;
    while !producer.is_finished() {
        let snapshot = capture.snapshot();
        assert!(snapshot.len() >= last_len);
        assert!(snapshot
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp()));
        last_len = snapshot.len();
    }
    producer.join().unwrap();
    capture.stop();

    assert_eq!(capture.count(), 500);
}

#[test]
fn test_clear_resets_buffer_and_speed() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();

    handle.move_to(0, 0, 0.0);
    handle.move_to(100, 0, 1.0);
    wait_for_count(&capture, 2);

    capture.clear();
    assert_eq!(capture.count(), 0);

    handle.move_to(900, 0, 2.0);
    capture.stop();

    let events = capture.snapshot();
    assert_eq!(events.len(), 1);
    // Speed restarts after a clear instead of measuring from (100, 0).
    assert_eq!(events[0].speed(), 0.0);

    capture.clear();
    capture.clear();
    assert!(capture.buffer().is_empty());
}

#[test]
fn test_clear_while_notifications_are_queued() {
    for _ in 0..20 {
        let (mut capture, handle) = manual_capture();
        capture.start().unwrap();

        handle.move_to(0, 0, 0.0);
        handle.move_to(100, 0, 1.0);
        handle.press(100, 0, 1.05);
        capture.clear();
        handle.move_to(200, 0, 2.0);
        capture.stop();

        let events = capture.snapshot();
        assert_eq!(events.len(), 1, "pre-clear events survived: {events:?}");
        assert_eq!(events[0].position(), (200, 0));
        assert_eq!(events[0].speed(), 0.0);
    }
}

#[test]
fn test_source_disconnect_clears_running_flag() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();
    handle.disconnect();

    let deadline = Instant::now() + Duration::from_secs(5);
    while capture.is_running() {
        assert!(Instant::now() < deadline, "capture still reports running");
        thread::sleep(Duration::from_millis(5));
    }

    capture.start().unwrap();
    assert!(handle.move_to(5, 5, 0.5));
    capture.stop();
    assert_eq!(capture.count(), 1);
}

#[test]
fn test_restart_keeps_buffer_and_restarts_speed() {
    let (mut capture, handle) = manual_capture();

    capture.start().unwrap();
    handle.move_to(0, 0, 0.0);
    capture.stop();

    capture.start().unwrap();
    handle.move_to(50, 0, 1.0);
    capture.stop();

    let events = capture.snapshot();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].speed(), 0.0);
    assert_eq!(capture.counters().counts().sessions_started, 2);
}

#[test]
fn test_unavailable_source_fails_start() {
    let (source, handle) = ManualSource::unavailable("permission denied");
    let mut capture = EventCapture::new(source, CaptureConfig::default());

    match capture.start() {
        Err(CaptureError::CaptureUnavailable(reason)) => assert_eq!(reason, "permission denied"),
        other => panic!("expected CaptureUnavailable, got {other:?}"),
    }
    assert!(!capture.is_running());
    assert!(!handle.is_installed());
}

#[test]
fn test_drop_stops_capture() {
    let (mut capture, handle) = manual_capture();
    capture.start().unwrap();
    assert!(handle.is_installed());

    drop(capture);
    assert!(!handle.is_installed());
}

#[test]
fn test_small_queue_drops_instead_of_blocking() {
    let (source, handle) = ManualSource::new();
    let config = CaptureConfig {
        channel_capacity: 1,
        ..CaptureConfig::default()
    };
    let mut capture = EventCapture::new(source, config);
    capture.start().unwrap();

    let delivered = (0..2000)
        .filter(|&i| handle.press(i, i, f64::from(i) * 0.001))
        .count();
    capture.stop();

    let counts = capture.counters().counts();
    assert_eq!(counts.clicks_recorded as usize, delivered);
    assert_eq!(delivered as u64 + counts.notifications_dropped, 2000);
    assert_eq!(capture.count(), delivered);
}
