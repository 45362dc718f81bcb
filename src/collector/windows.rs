//! Windows pointer source using a low-level mouse hook.
//!
//! `WH_MOUSE_LL` callbacks run on the thread that installed the hook, so the
//! hook lives on a dedicated message-loop thread. Uninstalling posts
//! `WM_QUIT` to that thread and joins it.

use crate::collector::clock::SessionClock;
use crate::collector::source::{PointerSink, PointerSource};
use crate::collector::types::RawPointerEvent;
use crate::error::CaptureError;
use crossbeam_channel::{bounded, Sender};
use std::cell::RefCell;
use std::thread::{self, JoinHandle};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetMessageW, PeekMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, HHOOK, MSG, MSLLHOOKSTRUCT, PM_NOREMOVE, WH_MOUSE_LL, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEMOVE, WM_QUIT, WM_RBUTTONDOWN,
    WM_RBUTTONUP, WM_USER, WM_XBUTTONDOWN, WM_XBUTTONUP,
};

/// Pointer source backed by a Windows low-level mouse hook.
pub struct WindowsSource {
    thread_handle: Option<JoinHandle<()>>,
    thread_id: Option<u32>,
}

impl WindowsSource {
    pub fn new() -> Self {
        Self {
            thread_handle: None,
            thread_id: None,
        }
    }
}

impl Default for WindowsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for WindowsSource {
    fn install(&mut self, sink: PointerSink, clock: SessionClock) -> Result<(), CaptureError> {
        if self.thread_handle.is_some() {
            return Ok(());
        }

        let (ready_tx, ready_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("snapposition-mouse-hook".to_string())
            .spawn(move || run_hook_loop(sink, clock, ready_tx))
            .map_err(CaptureError::WorkerSpawn)?;

        let outcome = ready_rx.recv().unwrap_or_else(|_| {
            Err(CaptureError::CaptureUnavailable(
                "mouse hook thread exited during startup".to_string(),
            ))
        });

        match outcome {
            Ok(thread_id) => {
                self.thread_id = Some(thread_id);
                self.thread_handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                let _ = handle.join();
                Err(e)
            }
        }
    }

    fn uninstall(&mut self) {
        if let Some(thread_id) = self.thread_id.take() {
            // The hook thread created its message queue before reporting
            // ready, so the post cannot be lost.
            let posted = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
            if let Err(e) = posted {
                tracing::error!("failed to stop mouse hook thread: {e}");
            }
        }
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                tracing::error!("mouse hook thread panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "windows-mouse-hook"
    }
}

impl Drop for WindowsSource {
    fn drop(&mut self) {
        self.uninstall();
    }
}

// Hook callbacks cannot capture state; they run on the hook thread, which
// owns these for its lifetime.
thread_local! {
    static HOOK_SINK: RefCell<Option<PointerSink>> = const { RefCell::new(None) };
    static HOOK_CLOCK: RefCell<Option<SessionClock>> = const { RefCell::new(None) };
}

/// Low-level mouse hook callback.
unsafe extern "system" fn mouse_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    if n_code >= 0 {
        let mouse_struct = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        let x = mouse_struct.pt.x;
        let y = mouse_struct.pt.y;
        let timestamp = HOOK_CLOCK.with(|clock| clock.borrow().map(|c| c.now_secs()).unwrap_or(0.0));

        let event = match w_param.0 as u32 {
            WM_MOUSEMOVE => Some(RawPointerEvent::moved(x, y, timestamp)),
            WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN | WM_XBUTTONDOWN => {
                Some(RawPointerEvent::pressed(x, y, timestamp))
            }
            WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP | WM_XBUTTONUP => {
                Some(RawPointerEvent::released(x, y, timestamp))
            }
            _ => None,
        };

        if let Some(event) = event {
            HOOK_SINK.with(|sink| {
                if let Some(ref sink) = *sink.borrow() {
                    sink.push(event);
                }
            });
        }
    }

    CallNextHookEx(HHOOK::default(), n_code, w_param, l_param)
}

/// Install the hook, report the thread id, and pump messages until `WM_QUIT`.
fn run_hook_loop(sink: PointerSink, clock: SessionClock, ready: Sender<Result<u32, CaptureError>>) {
    HOOK_SINK.with(|s| *s.borrow_mut() = Some(sink));
    HOOK_CLOCK.with(|c| *c.borrow_mut() = Some(clock));

    unsafe {
        let hook = match SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) {
            Ok(hook) => hook,
            Err(e) => {
                HOOK_SINK.with(|s| s.borrow_mut().take());
                let _ = ready.send(Err(CaptureError::CaptureUnavailable(format!(
                    "failed to install mouse hook: {e}"
                ))));
                return;
            }
        };

        // Force creation of this thread's message queue so WM_QUIT can be
        // posted as soon as install returns.
        let mut msg = MSG::default();
        let _ = PeekMessageW(&mut msg, HWND::default(), WM_USER, WM_USER, PM_NOREMOVE);

        if ready.send(Ok(GetCurrentThreadId())).is_ok() {
            tracing::debug!("mouse hook installed");
            // 0 means WM_QUIT, -1 an error; both end the loop.
            while GetMessageW(&mut msg, HWND::default(), 0, 0).0 > 0 {}
        }

        if let Err(e) = UnhookWindowsHookEx(hook) {
            tracing::warn!("failed to remove mouse hook: {e}");
        }
    }

    HOOK_SINK.with(|s| s.borrow_mut().take());
    tracing::debug!("mouse hook removed");
}

/// Check whether a low-level mouse hook can be installed.
pub fn check_permission() -> bool {
    unsafe {
        match SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) {
            Ok(hook) => {
                let _ = UnhookWindowsHookEx(hook);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_creation() {
        let source = WindowsSource::new();
        assert!(source.thread_handle.is_none());
        assert!(source.thread_id.is_none());
    }

    #[test]
    fn test_uninstall_without_install_is_noop() {
        let mut source = WindowsSource::new();
        source.uninstall();
        source.uninstall();
        assert!(source.thread_handle.is_none());
    }
}
