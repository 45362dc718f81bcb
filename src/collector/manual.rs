//! A pointer source driven by hand.
//!
//! Used to replay recorded sessions through the sampling rules and to drive
//! the capture pipeline in tests without a platform hook.

use crate::collector::clock::SessionClock;
use crate::collector::source::{PointerSink, PointerSource};
use crate::collector::types::RawPointerEvent;
use crate::error::CaptureError;
use std::sync::{Arc, Mutex, PoisonError};

type SharedSink = Arc<Mutex<Option<PointerSink>>>;

/// Source whose notifications come from a [`ManualHandle`].
#[derive(Debug)]
pub struct ManualSource {
    sink: SharedSink,
    unavailable: Option<String>,
}

impl ManualSource {
    /// Create a source and the handle that feeds it.
    pub fn new() -> (Self, ManualHandle) {
        let sink: SharedSink = Arc::new(Mutex::new(None));
        let source = Self {
            sink: sink.clone(),
            unavailable: None,
        };
        (source, ManualHandle { sink })
    }

    /// A source whose `install` always fails with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> (Self, ManualHandle) {
        let (mut source, handle) = Self::new();
        source.unavailable = Some(reason.into());
        (source, handle)
    }
}

impl PointerSource for ManualSource {
    fn install(&mut self, sink: PointerSink, _clock: SessionClock) -> Result<(), CaptureError> {
        if let Some(reason) = &self.unavailable {
            return Err(CaptureError::CaptureUnavailable(reason.clone()));
        }
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
        Ok(())
    }

    fn uninstall(&mut self) {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// Feeds notifications with explicit timestamps into a [`ManualSource`].
#[derive(Debug, Clone)]
pub struct ManualHandle {
    sink: SharedSink,
}

impl ManualHandle {
    /// Deliver a notification. Returns `false` when the source is not
    /// installed or the queue is full.
    pub fn send(&self, event: RawPointerEvent) -> bool {
        match self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(sink) => sink.push(event),
            None => false,
        }
    }

    pub fn move_to(&self, x: i32, y: i32, timestamp: f64) -> bool {
        self.send(RawPointerEvent::moved(x, y, timestamp))
    }

    pub fn press(&self, x: i32, y: i32, timestamp: f64) -> bool {
        self.send(RawPointerEvent::pressed(x, y, timestamp))
    }

    pub fn release(&self, x: i32, y: i32, timestamp: f64) -> bool {
        self.send(RawPointerEvent::released(x, y, timestamp))
    }

    /// Release the sink as a failing platform hook would, without the
    /// capture session asking for it.
    pub fn disconnect(&self) {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Whether the source is currently installed.
    pub fn is_installed(&self) -> bool {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
