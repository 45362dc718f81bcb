//! Pointer event types.
//!
//! `RawPointerEvent` is what a platform source reports. `PointerEvent` is the
//! normalized record the capture worker appends to the session buffer.

use crate::error::EventError;
use serde::{Deserialize, Serialize};

/// A normalized pointer sample.
///
/// Fields are validated once in [`PointerEvent::new`] and cannot change
/// afterwards. Deserialization goes through the same constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointerEventRecord")]
pub struct PointerEvent {
    x: i32,
    y: i32,
    speed: f64,
    #[serde(rename = "click")]
    is_click: bool,
    timestamp: f64,
}

impl PointerEvent {
    /// Create a validated event.
    ///
    /// `speed` must be finite and non-negative; `timestamp` must be finite and
    /// non-negative (seconds on the session clock).
    pub fn new(x: i32, y: i32, speed: f64, is_click: bool, timestamp: f64) -> Result<Self, EventError> {
        if !speed.is_finite() {
            return Err(EventError::NonFiniteSpeed(speed));
        }
        if speed < 0.0 {
            return Err(EventError::NegativeSpeed(speed));
        }
        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(EventError::InvalidTimestamp(timestamp));
        }

        Ok(Self {
            x,
            y,
            speed,
            is_click,
            timestamp,
        })
    }

    /// Build an event from values the sampler has already normalized.
    pub(crate) fn sampled(x: i32, y: i32, speed: f64, is_click: bool, timestamp: f64) -> Self {
        debug_assert!(speed.is_finite() && speed >= 0.0);
        debug_assert!(timestamp.is_finite() && timestamp >= 0.0);
        Self {
            x,
            y,
            speed,
            is_click,
            timestamp,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Instantaneous speed in pixels per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_click(&self) -> bool {
        self.is_click
    }

    /// Monotonic seconds since the capture session clock started.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Euclidean distance to another event's position.
    pub fn distance_to(&self, other: &PointerEvent) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Wire shape of a pointer event, checked on the way in.
#[derive(Deserialize)]
struct PointerEventRecord {
    x: i32,
    y: i32,
    speed: f64,
    click: bool,
    timestamp: f64,
}

impl TryFrom<PointerEventRecord> for PointerEvent {
    type Error = EventError;

    fn try_from(record: PointerEventRecord) -> Result<Self, Self::Error> {
        PointerEvent::new(record.x, record.y, record.speed, record.click, record.timestamp)
    }
}

/// What happened at the platform level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawPointerKind {
    /// Pointer moved (including drags)
    Moved,
    /// A button went down
    Pressed,
    /// A button went up (never recorded)
    Released,
}

/// An unprocessed notification from a [`PointerSource`](crate::collector::PointerSource).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: RawPointerKind,
    pub x: i32,
    pub y: i32,
    /// Arrival time on the session clock, in seconds
    pub timestamp: f64,
}

impl RawPointerEvent {
    pub fn moved(x: i32, y: i32, timestamp: f64) -> Self {
        Self {
            kind: RawPointerKind::Moved,
            x,
            y,
            timestamp,
        }
    }

    pub fn pressed(x: i32, y: i32, timestamp: f64) -> Self {
        Self {
            kind: RawPointerKind::Pressed,
            x,
            y,
            timestamp,
        }
    }

    pub fn released(x: i32, y: i32, timestamp: f64) -> Self {
        Self {
            kind: RawPointerKind::Released,
            x,
            y,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_validation() {
        assert!(PointerEvent::new(10, 20, 0.0, false, 0.0).is_ok());
        assert_eq!(
            PointerEvent::new(0, 0, -1.0, false, 0.0),
            Err(EventError::NegativeSpeed(-1.0))
        );
        assert!(matches!(
            PointerEvent::new(0, 0, f64::NAN, false, 0.0),
            Err(EventError::NonFiniteSpeed(_))
        ));
        assert!(matches!(
            PointerEvent::new(0, 0, 1.0, false, -0.5),
            Err(EventError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_event_distance() {
        let a = PointerEvent::new(0, 0, 0.0, false, 0.0).unwrap();
        let b = PointerEvent::new(3, 4, 0.0, false, 1.0).unwrap();
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_wire_format() {
        let event = PointerEvent::new(5, 7, 12.5, true, 1.25).unwrap();
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["x"], 5);
        assert_eq!(json["y"], 7);
        assert_eq!(json["click"], true);
        assert_eq!(json["timestamp"], 1.25);
    }

    #[test]
    fn test_deserialize_rejects_negative_speed() {
        let json = r#"{"x": 1, "y": 2, "speed": -3.0, "click": false, "timestamp": 0.0}"#;
        assert!(serde_json::from_str::<PointerEvent>(json).is_err());
    }
}
