//! Session export files.
//!
//! An export holds the raw events plus the statistics computed from them,
//! so a session can be re-analyzed later with different grid settings.

use crate::collector::types::PointerEvent;
use crate::core::aggregate::SessionStats;
use crate::error::ExportError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application name recorded in export metadata.
pub const APP_NAME: &str = "SnapPosition";

/// Header block of an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub export_time: DateTime<Local>,
    pub total_events: usize,
    #[serde(default = "default_app")]
    pub app: String,
}

fn default_app() -> String {
    APP_NAME.to_string()
}

/// A complete exported session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub metadata: ExportMetadata,
    pub statistics: SessionStats,
    pub events: Vec<PointerEvent>,
}

impl SessionExport {
    /// Wrap a snapshot and its statistics, stamped with the current time.
    pub fn new(events: Vec<PointerEvent>, statistics: SessionStats) -> Self {
        Self {
            metadata: ExportMetadata {
                export_time: Local::now(),
                total_events: events.len(),
                app: default_app(),
            },
            statistics,
            events,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export. Every event is validated on the way in.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the export to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        tracing::debug!(path = %path.display(), events = self.events.len(), "session exported");
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Timestamped file name for a new export.
    pub fn default_file_name() -> String {
        Local::now()
            .format("snapposition_%Y%m%d_%H%M%S.json")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate;

    fn sample_events() -> Vec<PointerEvent> {
        vec![
            PointerEvent::new(10, 20, 0.0, false, 0.0).unwrap(),
            PointerEvent::new(40, 60, 50.0, true, 1.0).unwrap(),
        ]
    }

    #[test]
    fn test_export_schema() {
        let events = sample_events();
        let stats = aggregate(&events, 50).stats;
        let export = SessionExport::new(events, stats);

        let json: serde_json::Value =
            serde_json::from_str(&export.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["metadata"]["total_events"], 2);
        assert_eq!(json["metadata"]["app"], "SnapPosition");
        assert!(json["metadata"]["export_time"].is_string());
        assert_eq!(json["statistics"]["total_clicks"], 1);
        assert_eq!(json["events"][1]["click"], true);
        assert_eq!(json["events"][1]["x"], 40);
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join(SessionExport::default_file_name());

        let events = sample_events();
        let stats = aggregate(&events, 50).stats;
        let export = SessionExport::new(events, stats);
        export.write_to(&path).unwrap();

        let loaded = SessionExport::read_from(&path).unwrap();
        assert_eq!(loaded.events, export.events);
        assert_eq!(loaded.statistics, export.statistics);
    }

    #[test]
    fn test_missing_app_defaults() {
        let json = r#"{
            "metadata": {"export_time": "2024-05-01T12:00:00+00:00", "total_events": 0},
            "statistics": {"total_events": 0, "total_clicks": 0, "avg_speed": 0, "max_speed": 0,
                           "min_speed": 0, "speed_std": 0, "duration": 0,
                           "distance_traveled": 0, "acceleration_bursts": 0},
            "events": []
        }"#;
        let export = SessionExport::from_json(json).unwrap();
        assert_eq!(export.metadata.app, APP_NAME);
        assert!(export.events.is_empty());
    }

    #[test]
    fn test_invalid_event_rejected() {
        let json = r#"{
            "metadata": {"export_time": "2024-05-01T12:00:00+00:00", "total_events": 1},
            "statistics": {"total_events": 0, "total_clicks": 0, "avg_speed": 0, "max_speed": 0,
                           "min_speed": 0, "speed_std": 0, "duration": 0,
                           "distance_traveled": 0, "acceleration_bursts": 0},
            "events": [{"x": 1, "y": 2, "speed": -5.0, "click": false, "timestamp": 0.0}]
        }"#;
        assert!(matches!(
            SessionExport::from_json(json),
            Err(ExportError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SessionExport::read_from(&dir.path().join("nope.json")),
            Err(ExportError::Io(_))
        ));
    }

    #[test]
    fn test_default_file_name_shape() {
        let name = SessionExport::default_file_name();
        assert!(name.starts_with("snapposition_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "snapposition_20240101_120000.json".len());
    }
}
