//! Capture telemetry.
//!
//! In-memory counters describing what the capture pipeline saw and kept,
//! shown by the CLI and logged when a session stops.

pub mod counters;

pub use counters::{CaptureCounters, CaptureCounts, SharedCaptureCounters};
