//! Pointer source for platforms without a supported input hook.
//!
//! Lets the crate and binary compile everywhere; `install` always fails
//! with `CaptureUnavailable` so callers learn capture cannot run here.

use crate::collector::clock::SessionClock;
use crate::collector::source::{PointerSink, PointerSource};
use crate::error::CaptureError;

/// A source that can never be installed.
#[derive(Debug, Default)]
pub struct UnsupportedSource;

impl UnsupportedSource {
    pub fn new() -> Self {
        Self
    }
}

impl PointerSource for UnsupportedSource {
    fn install(&mut self, _sink: PointerSink, _clock: SessionClock) -> Result<(), CaptureError> {
        Err(CaptureError::CaptureUnavailable(format!(
            "no pointer hook is available on {}",
            std::env::consts::OS
        )))
    }

    fn uninstall(&mut self) {}

    fn name(&self) -> &'static str {
        "unsupported"
    }
}

/// There is no hook to install on this platform.
pub fn check_permission() -> bool {
    false
}
