//! Pointer capture for SnapPosition.
//!
//! Platform sources report raw move and button notifications; the capture
//! worker turns them into rate-limited [`PointerEvent`]s in the session
//! buffer.

pub mod capture;
pub mod clock;
pub mod manual;
pub mod sampler;
pub mod source;
pub mod types;
pub mod unsupported;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

// Re-export commonly used types
pub use capture::EventCapture;
pub use clock::SessionClock;
pub use manual::{ManualHandle, ManualSource};
pub use sampler::{MotionSampler, Sample, DEFAULT_SAMPLE_INTERVAL};
pub use source::{Notification, PointerSink, PointerSource};
pub use types::{PointerEvent, RawPointerEvent, RawPointerKind};
pub use unsupported::UnsupportedSource;

#[cfg(target_os = "macos")]
pub use macos::{check_permission, MacOSSource};

/// Platform-agnostic pointer source type alias
#[cfg(target_os = "macos")]
pub type PlatformSource = MacOSSource;

#[cfg(target_os = "windows")]
pub use self::windows::{check_permission, WindowsSource};

/// Platform-agnostic pointer source type alias
#[cfg(target_os = "windows")]
pub type PlatformSource = WindowsSource;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub use unsupported::check_permission;

/// Platform-agnostic pointer source type alias
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub type PlatformSource = UnsupportedSource;

/// Capture session over this platform's pointer source.
pub type Capture = EventCapture<PlatformSource>;
