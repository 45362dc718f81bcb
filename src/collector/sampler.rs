//! Rate limiting and speed computation for raw pointer notifications.

use crate::collector::types::{PointerEvent, RawPointerEvent, RawPointerKind};
use std::time::Duration;

/// Default minimum spacing between recorded move samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of feeding one raw notification to the sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// A normalized event to append
    Recorded(PointerEvent),
    /// Move arrived sooner than the sample interval allows
    RateLimited,
    /// Button release, never recorded
    Ignored,
}

/// Turns raw notifications into [`PointerEvent`]s.
///
/// Moves are rate limited against the last accepted *move*; clicks are never
/// dropped and do not push the next move sample back. Speed is measured
/// against the last recorded event of either kind.
#[derive(Debug, Clone)]
pub struct MotionSampler {
    sample_interval: f64,
    last_sample_time: Option<f64>,
    last_position: (i32, i32),
    last_timestamp: Option<f64>,
}

impl MotionSampler {
    pub fn new(sample_interval: Duration) -> Self {
        Self {
            sample_interval: sample_interval.as_secs_f64(),
            last_sample_time: None,
            last_position: (0, 0),
            last_timestamp: None,
        }
    }

    /// Forget all timing state so the next event starts with speed 0.
    pub fn reset(&mut self) {
        self.last_sample_time = None;
        self.last_position = (0, 0);
        self.last_timestamp = None;
    }

    /// Process one raw notification.
    pub fn sample(&mut self, raw: RawPointerEvent) -> Sample {
        match raw.kind {
            RawPointerKind::Released => Sample::Ignored,
            RawPointerKind::Moved => {
                if let Some(last) = self.last_sample_time {
                    if raw.timestamp - last < self.sample_interval {
                        return Sample::RateLimited;
                    }
                }
                let event = self.record(raw, false);
                self.last_sample_time = Some(event.timestamp());
                Sample::Recorded(event)
            }
            RawPointerKind::Pressed => Sample::Recorded(self.record(raw, true)),
        }
    }

    fn record(&mut self, raw: RawPointerEvent, is_click: bool) -> PointerEvent {
        // Keep the stream non-decreasing even if a source stamps out of order.
        let timestamp = match self.last_timestamp {
            Some(last) if !(raw.timestamp >= last) => last,
            _ if raw.timestamp.is_finite() => raw.timestamp.max(0.0),
            _ => 0.0,
        };
        let speed = self.speed_to(raw.x, raw.y, timestamp);

        self.last_position = (raw.x, raw.y);
        self.last_timestamp = Some(timestamp);

        PointerEvent::sampled(raw.x, raw.y, speed, is_click, timestamp)
    }

    /// Pixels per second from the last recorded position, rounded to 2 decimals.
    fn speed_to(&self, x: i32, y: i32, timestamp: f64) -> f64 {
        let Some(last) = self.last_timestamp else {
            return 0.0;
        };
        let elapsed = timestamp - last;
        if elapsed <= 0.0 {
            return 0.0;
        }

        let dx = f64::from(x) - f64::from(self.last_position.0);
        let dy = f64::from(y) - f64::from(self.last_position.1);
        let speed = (dx * dx + dy * dy).sqrt() / elapsed;
        if speed.is_finite() {
            (speed * 100.0).round() / 100.0
        } else {
            0.0
        }
    }
}

impl Default for MotionSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}
