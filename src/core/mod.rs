//! Core analysis for SnapPosition.
//!
//! This module contains:
//! - Grid layout over a session's bounding box
//! - Spatial aggregation into density and hesitation grids
//! - Hesitation zone ranking and profile classification
//! - Session export files
//!
//! Everything here is pure and operates on snapshots, never on the live buffer.

pub mod aggregate;
pub mod export;
pub mod grid;
pub mod hesitation;
pub mod profile;

// Re-export commonly used types
pub use aggregate::{aggregate, detect_acceleration, AggregateResult, SessionStats, DEFAULT_CELL_SIZE};
pub use export::{ExportMetadata, SessionExport};
pub use grid::{Bounds, Grid, GridSpec, MAX_GRID_CELLS};
pub use hesitation::{top_zones, HesitationZone, DEFAULT_TOP_ZONES};
pub use profile::{classify, PersonalityProfile};
