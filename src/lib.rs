//! SnapPosition - pointer movement capture and spatial behavior analytics.
//!
//! This library records pointer moves and clicks for a session, then turns
//! the session into grid-based density and hesitation maps, summary
//! statistics, and a coarse movement profile.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SnapPosition                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Source    │──▶│   Capture   │──▶│ EventBuffer │       │
//! │  │ (OS hook)   │   │  (sampler)  │   │  (session)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                              │ snapshot     │
//! │                                              ▼              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Profile   │◀──│  Aggregate  │──▶│ Hesitation  │       │
//! │  │ (classify)  │   │   (grids)   │   │   zones     │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use snapposition::{aggregate, classify, collector, top_zones, CaptureConfig};
//!
//! // Requires Input Monitoring permission on macOS
//! let mut capture = collector::Capture::new(
//!     collector::PlatformSource::default(),
//!     CaptureConfig::default(),
//! );
//! capture.start().expect("pointer capture unavailable");
//! std::thread::sleep(std::time::Duration::from_secs(10));
//! capture.stop();
//!
//! let result = aggregate(&capture.snapshot(), 50);
//! println!("{}", classify(&result.stats));
//! for zone in top_zones(&result, 5) {
//!     println!("({}, {}) {:.2}s", zone.grid_x, zone.grid_y, zone.dwell_secs);
//! }
//! ```

pub mod buffer;
pub mod collector;
pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;

// Re-export key types at crate root for convenience
pub use buffer::{ClearGeneration, EventBuffer};
pub use collector::{EventCapture, ManualHandle, ManualSource, PointerEvent, PointerSource};
pub use config::{CaptureConfig, Config};
pub use crate::core::{
    aggregate, classify, top_zones, AggregateResult, HesitationZone, PersonalityProfile,
    SessionExport, SessionStats,
};
pub use error::{CaptureError, ConfigError, EventError, ExportError};
pub use telemetry::{CaptureCounters, SharedCaptureCounters};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_session_end_to_end() {
        let (source, handle) = ManualSource::new();
        let mut capture = EventCapture::new(source, CaptureConfig::default());
        capture.start().unwrap();

        handle.move_to(0, 0, 0.0);
        handle.move_to(10, 0, 1.0);
        handle.press(10, 0, 1.5);
        capture.stop();

        let result = aggregate(&capture.snapshot(), crate::core::DEFAULT_CELL_SIZE);
        assert_eq!(result.stats.total_events, 3);
        assert_eq!(result.stats.total_clicks, 1);
        assert!(!top_zones(&result, 5).is_empty());
        assert!(!VERSION.is_empty());
    }
}
