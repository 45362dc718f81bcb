//! macOS pointer source using a CGEvent tap.
//!
//! The tap runs listen-only on its own run-loop thread. It requires Input
//! Monitoring permission; without it tap creation fails and `install`
//! reports `CaptureUnavailable`.

use crate::collector::clock::SessionClock;
use crate::collector::source::{PointerSink, PointerSource};
use crate::collector::types::RawPointerEvent;
use crate::error::CaptureError;
use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
    CallbackResult,
};
use crossbeam_channel::{bounded, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pointer source backed by a CoreGraphics event tap.
pub struct MacOSSource {
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl MacOSSource {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }
}

impl Default for MacOSSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for MacOSSource {
    fn install(&mut self, sink: PointerSink, clock: SessionClock) -> Result<(), CaptureError> {
        if self.thread_handle.is_some() {
            return Ok(());
        }

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let (ready_tx, ready_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("snapposition-event-tap".to_string())
            .spawn(move || run_event_loop(sink, clock, running, ready_tx))
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::WorkerSpawn(e)
            })?;

        // The thread reports whether the tap could be created before it
        // starts pumping events.
        let outcome = ready_rx.recv().unwrap_or_else(|_| {
            Err(CaptureError::CaptureUnavailable(
                "event tap thread exited during startup".to_string(),
            ))
        });

        match outcome {
            Ok(()) => {
                self.thread_handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(e)
            }
        }
    }

    fn uninstall(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            // The run loop wakes at least every 100ms to check the flag.
            if handle.join().is_err() {
                tracing::error!("event tap thread panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "macos-event-tap"
    }
}

impl Drop for MacOSSource {
    fn drop(&mut self) {
        self.uninstall();
    }
}

/// Pointer event types the tap listens for.
fn pointer_event_types() -> Vec<CGEventType> {
    vec![
        CGEventType::MouseMoved,
        CGEventType::LeftMouseDragged,
        CGEventType::RightMouseDragged,
        CGEventType::OtherMouseDragged,
        CGEventType::LeftMouseDown,
        CGEventType::LeftMouseUp,
        CGEventType::RightMouseDown,
        CGEventType::RightMouseUp,
        CGEventType::OtherMouseDown,
        CGEventType::OtherMouseUp,
    ]
}

/// Create the tap, report the outcome, then pump the run loop until stopped.
fn run_event_loop(
    sink: PointerSink,
    clock: SessionClock,
    running: Arc<AtomicBool>,
    ready: Sender<Result<(), CaptureError>>,
) {
    let tap = CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        pointer_event_types(),
        move |_proxy, event_type, event| {
            if let Some(raw) = process_cg_event(event_type, event, clock.now_secs()) {
                sink.push(raw);
            }
            CallbackResult::Keep
        },
    );

    let tap = match tap {
        Ok(tap) => tap,
        Err(_) => {
            let _ = ready.send(Err(CaptureError::CaptureUnavailable(
                "failed to create CGEvent tap (is Input Monitoring permission granted?)"
                    .to_string(),
            )));
            return;
        }
    };

    let source = match tap.mach_port().create_runloop_source(0) {
        Ok(source) => source,
        Err(_) => {
            let _ = ready.send(Err(CaptureError::CaptureUnavailable(
                "failed to create run loop source for event tap".to_string(),
            )));
            return;
        }
    };

    let run_loop = CFRunLoop::get_current();
    unsafe {
        run_loop.add_source(&source, kCFRunLoopCommonModes);
    }
    tap.enable();

    if ready.send(Ok(())).is_err() {
        return;
    }
    tracing::debug!("event tap installed");

    while running.load(Ordering::SeqCst) {
        CFRunLoop::run_in_mode(
            unsafe { kCFRunLoopDefaultMode },
            Duration::from_millis(100),
            false,
        );
    }

    // Dropping the tap here releases the callback and with it the sink.
    tracing::debug!("event tap removed");
}

/// Convert a CGEvent into a raw pointer notification.
fn process_cg_event(event_type: CGEventType, event: &CGEvent, timestamp: f64) -> Option<RawPointerEvent> {
    use core_graphics::event::CGEventType::*;

    let location = event.location();
    let x = location.x.round() as i32;
    let y = location.y.round() as i32;

    match event_type {
        MouseMoved | LeftMouseDragged | RightMouseDragged | OtherMouseDragged => {
            Some(RawPointerEvent::moved(x, y, timestamp))
        }
        LeftMouseDown | RightMouseDown | OtherMouseDown => {
            Some(RawPointerEvent::pressed(x, y, timestamp))
        }
        LeftMouseUp | RightMouseUp | OtherMouseUp => {
            Some(RawPointerEvent::released(x, y, timestamp))
        }
        TapDisabledByTimeout | TapDisabledByUserInput => {
            tracing::warn!("event tap disabled by the system");
            None
        }
        _ => None,
    }
}

/// Check whether a pointer event tap can be created.
///
/// macOS has no direct query for Input Monitoring; creating a passive tap
/// fails when permission is missing.
pub fn check_permission() -> bool {
    CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        vec![CGEventType::MouseMoved],
        |_proxy, _type, _event| CallbackResult::Keep,
    )
    .is_ok()
}
