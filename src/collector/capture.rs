//! Capture session: wires a pointer source to the session buffer.
//!
//! ```text
//!  platform hook ──Notification─────▶ bounded channel ──▶ capture worker ──append──▶ EventBuffer
//!   (source thread)                                       (MotionSampler)             (snapshot/count)
//! ```
//!
//! The worker is the buffer's only writer. `stop()` uninstalls the source,
//! lets the worker drain what was already queued, and joins it.
//!
//! Every queued notification carries the buffer generation it was produced
//! in. `clear()` starts a new generation, so notifications still in the
//! channel from before the clear are discarded rather than appended, and
//! the sampler restarts on the first notification of the new generation.

use crate::buffer::EventBuffer;
use crate::collector::clock::SessionClock;
use crate::collector::sampler::{MotionSampler, Sample};
use crate::collector::source::{Notification, PointerSink, PointerSource};
use crate::collector::types::{PointerEvent, RawPointerKind};
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::telemetry::{CaptureCounters, SharedCaptureCounters};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use uuid::Uuid;

/// How often an idle worker re-checks the running flag.
const WORKER_POLL: Duration = Duration::from_millis(100);

/// An explicit capture session over a [`PointerSource`].
///
/// Lifecycle is `new → start → stop → drop`; start and stop may repeat.
/// Dropping a running capture stops it.
pub struct EventCapture<S: PointerSource> {
    config: CaptureConfig,
    source: S,
    buffer: EventBuffer,
    counters: SharedCaptureCounters,
    clock: SessionClock,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    session_id: Uuid,
}

impl<S: PointerSource> EventCapture<S> {
    /// Create a stopped capture session around `source`.
    pub fn new(source: S, config: CaptureConfig) -> Self {
        Self {
            config,
            source,
            buffer: EventBuffer::new(),
            counters: Arc::new(CaptureCounters::new()),
            clock: SessionClock::new(),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            session_id: Uuid::new_v4(),
        }
    }

    /// Begin capturing. A no-op while already running.
    ///
    /// If the source cannot be installed the error is returned and the
    /// capture stays stopped.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_running() {
            return Ok(());
        }
        // The worker exited on its own after the source went away.
        if self.worker.is_some() {
            self.stop();
        }

        let (sender, receiver) = bounded(self.config.channel_capacity.max(1));
        let sink = PointerSink::new(
            sender,
            self.buffer.clear_generation(),
            self.counters.clone(),
        );
        self.source.install(sink, self.clock)?;

        let worker = CaptureWorker {
            receiver,
            buffer: self.buffer.clone(),
            sampler: MotionSampler::new(self.config.sample_interval),
            sampler_generation: self.buffer.generation(),
            counters: self.counters.clone(),
            running: self.running.clone(),
        };

        self.running.store(true, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("snapposition-capture".to_string())
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                self.counters.record_session_started();
                tracing::info!(
                    session_id = %self.session_id,
                    source = self.source.name(),
                    sample_interval_ms = self.config.sample_interval.as_millis() as u64,
                    "pointer capture started"
                );
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                self.source.uninstall();
                Err(CaptureError::WorkerSpawn(e))
            }
        }
    }

    /// Stop capturing. A no-op while stopped.
    ///
    /// Returns once the source is removed and the worker has exited; nothing
    /// is appended to the buffer afterwards.
    pub fn stop(&mut self) {
        if !self.is_running() && self.worker.is_none() {
            return;
        }

        self.running.store(false, Ordering::SeqCst);
        self.source.uninstall();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::error!(session_id = %self.session_id, "capture worker panicked");
            }
        }

        tracing::info!(
            session_id = %self.session_id,
            events = self.buffer.count(),
            "pointer capture stopped"
        );
    }

    /// Whether capture is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Empty the buffer.
    ///
    /// Notifications queued before the call are discarded, and sampling
    /// state restarts with the first one queued after it.
    pub fn clear(&self) {
        self.buffer.clear();
    }

    /// Independent copy of the events captured so far.
    pub fn snapshot(&self) -> Vec<PointerEvent> {
        self.buffer.snapshot()
    }

    /// Number of captured events.
    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    /// Shared handle to the session buffer.
    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    pub fn counters(&self) -> &SharedCaptureCounters {
        &self.counters
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

impl<S: PointerSource> Drop for EventCapture<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved onto the worker thread.
struct CaptureWorker {
    receiver: Receiver<Notification>,
    buffer: EventBuffer,
    sampler: MotionSampler,
    /// Buffer generation the sampler state belongs to.
    sampler_generation: u64,
    counters: SharedCaptureCounters,
    running: Arc<AtomicBool>,
}

impl CaptureWorker {
    fn run(mut self) {
        loop {
            match self.receiver.recv_timeout(WORKER_POLL) {
                Ok(notification) => self.handle(notification),
                Err(RecvTimeoutError::Timeout) => {
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }
                }
                // The source released its sink: everything queued has been seen.
                Err(RecvTimeoutError::Disconnected) => {
                    if self.running.swap(false, Ordering::SeqCst) {
                        tracing::warn!("pointer source disconnected while capture was running");
                    }
                    return;
                }
            }
        }

        while let Ok(notification) = self.receiver.try_recv() {
            self.handle(notification);
        }
    }

    fn handle(&mut self, notification: Notification) {
        let Notification {
            generation,
            event: raw,
        } = notification;

        if generation < self.buffer.generation() {
            tracing::trace!(generation, "discarding notification queued before clear");
            return;
        }
        if generation != self.sampler_generation {
            self.sampler.reset();
            self.sampler_generation = generation;
            tracing::debug!(generation, "sampler timing reset after clear");
        }

        if raw.kind == RawPointerKind::Moved {
            self.counters.record_move_received();
        }

        match self.sampler.sample(raw) {
            Sample::Recorded(event) => {
                let is_click = event.is_click();
                // A clear may land between the generation check and here.
                if !self.buffer.append_if_current(event, generation) {
                    return;
                }
                if is_click {
                    self.counters.record_click_recorded();
                } else {
                    self.counters.record_move_recorded();
                }
            }
            Sample::RateLimited => self.counters.record_move_rate_limited(),
            Sample::Ignored => {}
        }
    }
}
