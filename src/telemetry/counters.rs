//! Counters for the capture pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Running totals updated by platform sources and the capture worker.
#[derive(Debug)]
pub struct CaptureCounters {
    /// Raw move notifications seen by the worker
    moves_received: AtomicU64,
    /// Moves discarded by the sample interval
    moves_rate_limited: AtomicU64,
    /// Moves appended to the buffer
    moves_recorded: AtomicU64,
    /// Clicks appended to the buffer
    clicks_recorded: AtomicU64,
    /// Notifications a source could not queue because the channel was full
    notifications_dropped: AtomicU64,
    /// Number of successful `start()` calls
    sessions_started: AtomicU64,
    /// When these counters were created
    created_at: DateTime<Utc>,
}

impl CaptureCounters {
    pub fn new() -> Self {
        Self {
            moves_received: AtomicU64::new(0),
            moves_rate_limited: AtomicU64::new(0),
            moves_recorded: AtomicU64::new(0),
            clicks_recorded: AtomicU64::new(0),
            notifications_dropped: AtomicU64::new(0),
            sessions_started: AtomicU64::new(0),
            created_at: Utc::now(),
        }
    }

    pub fn record_move_received(&self) {
        self.moves_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_move_rate_limited(&self) {
        self.moves_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_move_recorded(&self) {
        self.moves_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_click_recorded(&self) {
        self.clicks_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the new total so sources can log the first drop only.
    pub fn record_notification_dropped(&self) -> u64 {
        self.notifications_dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Current totals.
    pub fn counts(&self) -> CaptureCounts {
        CaptureCounts {
            moves_received: self.moves_received.load(Ordering::Relaxed),
            moves_rate_limited: self.moves_rate_limited.load(Ordering::Relaxed),
            moves_recorded: self.moves_recorded.load(Ordering::Relaxed),
            clicks_recorded: self.clicks_recorded.load(Ordering::Relaxed),
            notifications_dropped: self.notifications_dropped.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            created_at: self.created_at,
            uptime_secs: (Utc::now() - self.created_at).num_seconds().max(0) as u64,
        }
    }

    /// Human-readable block for terminal output.
    pub fn summary(&self) -> String {
        let counts = self.counts();
        format!(
            "Capture Statistics:\n\
             - Move notifications received: {}\n\
             - Moves skipped by sample interval: {}\n\
             - Moves recorded: {}\n\
             - Clicks recorded: {}\n\
             - Notifications dropped (queue full): {}\n\
             - Sessions started: {}\n\
             - Uptime: {} seconds",
            counts.moves_received,
            counts.moves_rate_limited,
            counts.moves_recorded,
            counts.clicks_recorded,
            counts.notifications_dropped,
            counts.sessions_started,
            counts.uptime_secs
        )
    }
}

impl Default for CaptureCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`CaptureCounters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureCounts {
    pub moves_received: u64,
    pub moves_rate_limited: u64,
    pub moves_recorded: u64,
    pub clicks_recorded: u64,
    pub notifications_dropped: u64,
    pub sessions_started: u64,
    pub created_at: DateTime<Utc>,
    pub uptime_secs: u64,
}

/// Counters shared between the capture owner, its worker and the source.
pub type SharedCaptureCounters = Arc<CaptureCounters>;
