//! Thread-safe session event buffer.

use crate::collector::types::PointerEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Append-only store of the current session's events.
///
/// Cloning yields another handle to the same buffer. Every operation takes
/// the single inner lock for its own duration only; consumers aggregate over
/// a [`snapshot`](EventBuffer::snapshot), never over the live sequence.
///
/// Each [`clear`](EventBuffer::clear) starts a new generation. Writers that
/// stamp their work with [`generation`](EventBuffer::generation) can use
/// [`append_if_current`](EventBuffer::append_if_current) so that nothing
/// read before a clear lands after it.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Arc<Mutex<Vec<PointerEvent>>>,
    generation: ClearGeneration,
}

/// Read-only view of a buffer's clear generation.
///
/// Handed to pointer sources so every notification carries the generation
/// it was produced in.
#[derive(Debug, Clone, Default)]
pub struct ClearGeneration(Arc<AtomicU64>);

impl ClearGeneration {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn advance(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event at the end of the stream.
    pub fn append(&self, event: PointerEvent) {
        self.lock().push(event);
    }

    /// Independent copy of the stream in insertion order.
    pub fn snapshot(&self) -> Vec<PointerEvent> {
        self.lock().clone()
    }

    /// Append `event` unless the buffer was cleared after `generation`.
    ///
    /// Returns whether the event was stored.
    pub fn append_if_current(&self, event: PointerEvent, generation: u64) -> bool {
        let mut events = self.lock();
        if self.generation.current() != generation {
            return false;
        }
        events.push(event);
        true
    }

    /// Drop all events and start a new generation.
    pub fn clear(&self) {
        let mut events = self.lock();
        self.generation.advance();
        events.clear();
    }

    /// Generation of the current stream; bumped by every clear.
    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    /// Shared read-only handle to the clear generation.
    pub fn clear_generation(&self) -> ClearGeneration {
        self.generation.clone()
    }

    /// Number of buffered events.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PointerEvent>> {
        // A panic while holding the lock cannot leave a Vec half-pushed, so
        // the data is still usable.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
