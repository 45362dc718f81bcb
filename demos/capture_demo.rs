//! Demonstration of SnapPosition capture and analysis.
//!
//! This example shows how to:
//! 1. Check whether the platform pointer hook is available
//! 2. Record a short live session, or replay a scripted one through a
//!    `ManualSource` when no hook can be installed
//! 3. Aggregate the session into density and hesitation grids
//! 4. Rank hesitation zones and classify the movement profile
//!
//! Run with: cargo run --example capture_demo
//!
//! Note: live capture requires Input Monitoring permission on macOS.

use std::time::Duration;

use snapposition::{
    aggregate, classify,
    collector::{check_permission, Capture, PlatformSource},
    top_zones, CaptureConfig, EventCapture, ManualSource, PointerEvent,
};

const LIVE_SECONDS: u64 = 15;

fn main() {
    println!("SnapPosition - Capture Demo");
    println!("===========================");
    println!();

    print!("Checking pointer hook... ");
    let events = if check_permission() {
        println!("OK ✓");
        record_live()
    } else {
        println!("unavailable, replaying a scripted session");
        replay_scripted()
    };
    println!();

    let result = aggregate(&events, 50);
    let stats = &result.stats;
    println!("Events: {} ({} clicks)", stats.total_events, stats.total_clicks);
    println!("Duration: {:.2}s", stats.duration);
    println!("Distance: {:.0}px", stats.distance_traveled);
    println!("Average speed: {:.1}px/s", stats.avg_speed);
    println!(
        "Grid: {}x{} cells",
        result.density_grid.columns(),
        result.density_grid.rows()
    );
    println!();

    println!("Top hesitation zones:");
    for zone in top_zones(&result, 5) {
        let (x, y) = zone.screen_origin(&result);
        println!(
            "  cell ({}, {}) near ({x}, {y}): {:.2}s",
            zone.grid_x, zone.grid_y, zone.dwell_secs
        );
    }
    println!();

    println!("Profile:");
    println!("{}", classify(stats));
}

fn record_live() -> Vec<PointerEvent> {
    let mut capture = Capture::new(PlatformSource::default(), CaptureConfig::default());
    if let Err(e) = capture.start() {
        eprintln!("Error starting capture: {e}");
        return Vec::new();
    }

    println!();
    println!("Move and click for {LIVE_SECONDS} seconds...");
    for _ in 0..LIVE_SECONDS {
        std::thread::sleep(Duration::from_secs(1));
        println!("  {} events", capture.count());
    }
    capture.stop();

    println!();
    println!("{}", capture.counters().summary());
    capture.snapshot()
}

/// Drive the capture pipeline with a scripted path: a quick sweep, a slow
/// approach to a button, a pause, and a click.
fn replay_scripted() -> Vec<PointerEvent> {
    let (source, handle) = ManualSource::new();
    let mut capture = EventCapture::new(source, CaptureConfig::default());
    if let Err(e) = capture.start() {
        eprintln!("Error starting capture: {e}");
        return Vec::new();
    }

    let mut t = 0.0;
    for step in 0..20 {
        handle.move_to(100 + step * 40, 200 + step * 10, t);
        t += 0.06;
    }
    for step in 0..10 {
        handle.move_to(900 + step * 3, 400, t);
        t += 0.2;
    }
    t += 1.5;
    handle.move_to(930, 401, t);
    handle.press(930, 401, t + 0.1);
    handle.release(930, 401, t + 0.2);

    capture.stop();
    capture.snapshot()
}
