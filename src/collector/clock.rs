//! Monotonic session clock.

use std::time::Instant;

/// Seconds elapsed since the clock was created, backed by [`Instant`].
///
/// Copies share the same origin, so a platform thread and the capture
/// owner agree on timestamps.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current time in seconds on this clock.
    pub fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
