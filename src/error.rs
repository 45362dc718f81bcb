//! Error types for capture, export and configuration.

use thiserror::Error;

/// Errors raised while starting pointer capture.
///
/// Aggregation, ranking and classification never fail; only the capture
/// boundary and file I/O have an error path.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The platform pointer hook could not be installed (missing permission,
    /// unsupported platform, hook rejected by the OS).
    #[error("pointer capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// The capture worker thread could not be spawned.
    #[error("failed to spawn capture worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

/// Rejected field values when constructing a [`PointerEvent`](crate::PointerEvent).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("speed must be finite, got {0}")]
    NonFiniteSpeed(f64),

    #[error("speed must be non-negative, got {0}")]
    NegativeSpeed(f64),

    #[error("timestamp must be finite and non-negative, got {0}")]
    InvalidTimestamp(f64),
}

/// Errors while writing or reading a session export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_display() {
        let err = CaptureError::CaptureUnavailable("no permission".to_string());
        assert!(err.to_string().contains("no permission"));
    }

    #[test]
    fn test_event_error_display() {
        let err = EventError::NegativeSpeed(-1.5);
        assert!(err.to_string().contains("-1.5"));
    }
}
