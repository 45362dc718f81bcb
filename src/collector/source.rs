//! The seam between platform input hooks and the capture worker.

use crate::buffer::ClearGeneration;
use crate::collector::clock::SessionClock;
use crate::collector::types::RawPointerEvent;
use crate::error::CaptureError;
use crate::telemetry::SharedCaptureCounters;
use crossbeam_channel::{Sender, TrySendError};

/// A provider of raw pointer notifications.
///
/// `install` must either succeed completely or leave nothing running.
/// `uninstall` is synchronous: once it returns, the source has released its
/// sink and will not deliver anything else.
pub trait PointerSource: Send {
    /// Start delivering notifications into `sink`, stamped with `clock`.
    fn install(&mut self, sink: PointerSink, clock: SessionClock) -> Result<(), CaptureError>;

    /// Stop delivering and release the sink.
    fn uninstall(&mut self);

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// A queued notification, stamped with the buffer generation it was
/// produced in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification {
    pub generation: u64,
    pub event: RawPointerEvent,
}

/// Sending half handed to a [`PointerSource`].
///
/// Never blocks: a notification that does not fit in the queue is counted
/// and dropped, so a slow consumer cannot stall the platform hook.
#[derive(Debug, Clone)]
pub struct PointerSink {
    sender: Sender<Notification>,
    generation: ClearGeneration,
    counters: SharedCaptureCounters,
}

impl PointerSink {
    pub fn new(
        sender: Sender<Notification>,
        generation: ClearGeneration,
        counters: SharedCaptureCounters,
    ) -> Self {
        Self {
            sender,
            generation,
            counters,
        }
    }

    /// Queue one notification. Returns `false` if it was not delivered.
    pub fn push(&self, event: RawPointerEvent) -> bool {
        let notification = Notification {
            generation: self.generation.current(),
            event,
        };
        match self.sender.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let dropped = self.counters.record_notification_dropped();
                if dropped == 1 || dropped % 1000 == 0 {
                    tracing::warn!(dropped, "capture queue full, dropping pointer notifications");
                }
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::EventBuffer;
    use crate::telemetry::CaptureCounters;
    use crossbeam_channel::bounded;
    use std::sync::Arc;

    #[test]
    fn test_push_counts_drops_when_full() {
        let (tx, rx) = bounded(1);
        let counters = Arc::new(CaptureCounters::new());
        let sink = PointerSink::new(tx, ClearGeneration::default(), counters.clone());

        assert!(sink.push(RawPointerEvent::moved(0, 0, 0.0)));
        assert!(!sink.push(RawPointerEvent::moved(1, 1, 0.1)));
        assert_eq!(counters.counts().notifications_dropped, 1);

        assert_eq!(rx.try_recv().unwrap().event.x, 0);
    }

    #[test]
    fn test_push_stamps_current_generation() {
        let (tx, rx) = bounded(4);
        let buffer = EventBuffer::new();
        let sink = PointerSink::new(
            tx,
            buffer.clear_generation(),
            Arc::new(CaptureCounters::new()),
        );

        assert!(sink.push(RawPointerEvent::moved(0, 0, 0.0)));
        buffer.clear();
        assert!(sink.push(RawPointerEvent::moved(1, 1, 0.1)));

        assert_eq!(rx.try_recv().unwrap().generation, 0);
        assert_eq!(rx.try_recv().unwrap().generation, 1);
    }

    #[test]
    fn test_push_after_disconnect() {
        let (tx, rx) = bounded(4);
        let counters = Arc::new(CaptureCounters::new());
        let sink = PointerSink::new(tx, ClearGeneration::default(), counters.clone());
        drop(rx);

        assert!(!sink.push(RawPointerEvent::moved(0, 0, 0.0)));
        assert_eq!(counters.counts().notifications_dropped, 0);
    }
}
