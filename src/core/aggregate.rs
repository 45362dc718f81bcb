//! Spatial aggregation of a captured pointer session.
//!
//! [`aggregate`] is a pure function over a snapshot: it never touches the
//! live buffer and never fails. Degenerate input (no events, one event)
//! produces a well-defined zeroed result.

use crate::collector::types::PointerEvent;
use crate::core::grid::{Bounds, Grid, GridSpec, DEFAULT_BOUNDS};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Default grid cell size in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 50;

/// Speeds below this (px/s) count as hesitation.
pub const HESITATION_SPEED_THRESHOLD: f64 = 100.0;

/// Speed change between consecutive events (px/s) that counts as a burst.
pub const ACCELERATION_BURST_THRESHOLD: f64 = 500.0;

/// Summary statistics for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_events: usize,
    pub total_clicks: usize,
    pub avg_speed: f64,
    pub max_speed: f64,
    pub min_speed: f64,
    pub speed_std: f64,
    /// Seconds between first and last event
    pub duration: f64,
    /// Pixels along the path, summed over consecutive pairs
    pub distance_traveled: f64,
    pub acceleration_bursts: usize,
}

/// Everything renderers and exporters need from one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Events per cell
    pub density_grid: Grid<u32>,
    /// Dwell seconds per cell
    pub hesitation_grid: Grid<f64>,
    pub speeds: Vec<f64>,
    pub click_positions: Vec<(i32, i32)>,
    pub path: Vec<(i32, i32)>,
    pub stats: SessionStats,
    /// Cell size the grids use; coarser than requested for very wide spreads
    pub cell_size: u32,
    pub bounds: Bounds,
}

impl AggregateResult {
    /// Canonical result for an empty stream.
    pub fn empty(cell_size: u32) -> Self {
        Self {
            density_grid: Grid::empty(),
            hesitation_grid: Grid::empty(),
            speeds: Vec::new(),
            click_positions: Vec::new(),
            path: Vec::new(),
            stats: SessionStats::default(),
            cell_size: cell_size.max(1),
            bounds: DEFAULT_BOUNDS,
        }
    }

    /// Grid layout the result was computed on, if any events were seen.
    pub fn grid_spec(&self) -> Option<GridSpec> {
        if self.density_grid.is_empty() {
            return None;
        }
        Some(GridSpec {
            bounds: self.bounds,
            cell_size: self.cell_size,
            columns: self.density_grid.columns(),
            rows: self.density_grid.rows(),
        })
    }
}

/// Aggregate a session snapshot into density and hesitation grids.
///
/// Events are taken in order. Dwell time since the previous event is
/// attributed to the cell the pointer arrives in when its speed is below
/// [`HESITATION_SPEED_THRESHOLD`].
pub fn aggregate(events: &[PointerEvent], cell_size: u32) -> AggregateResult {
    let Some(spec) = GridSpec::from_events(events, cell_size) else {
        return AggregateResult::empty(cell_size);
    };

    let mut density_grid: Grid<u32> = Grid::new(spec.rows, spec.columns);
    let mut hesitation_grid: Grid<f64> = Grid::new(spec.rows, spec.columns);
    let mut click_positions = Vec::new();
    let mut path = Vec::with_capacity(events.len());
    let mut prev_timestamp: Option<f64> = None;

    for event in events {
        let (grid_x, grid_y) = spec.cell_of(event.x(), event.y());
        *density_grid.cell_mut(grid_x, grid_y) += 1;

        if let Some(prev) = prev_timestamp {
            if event.speed() < HESITATION_SPEED_THRESHOLD {
                // Out-of-order input never drives a cell negative.
                *hesitation_grid.cell_mut(grid_x, grid_y) += (event.timestamp() - prev).max(0.0);
            }
        }
        prev_timestamp = Some(event.timestamp());

        if event.is_click() {
            click_positions.push(event.position());
        }
        path.push(event.position());
    }

    let speeds: Vec<f64> = events.iter().map(PointerEvent::speed).collect();
    let stats = compute_stats(events, &speeds);

    AggregateResult {
        density_grid,
        hesitation_grid,
        speeds,
        click_positions,
        path,
        stats,
        cell_size: spec.cell_size,
        bounds: spec.bounds,
    }
}

/// Compute session statistics. All-zero for an empty stream.
pub fn compute_stats(events: &[PointerEvent], speeds: &[f64]) -> SessionStats {
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return SessionStats::default();
    };

    let distance_traveled = events
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();

    let (avg_speed, max_speed, min_speed, speed_std) = if speeds.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (
            Statistics::mean(speeds.iter()),
            Statistics::max(speeds.iter()),
            Statistics::min(speeds.iter()),
            Statistics::population_std_dev(speeds.iter()),
        )
    };

    SessionStats {
        total_events: events.len(),
        total_clicks: events.iter().filter(|e| e.is_click()).count(),
        avg_speed,
        max_speed,
        min_speed,
        speed_std,
        duration: if events.len() >= 2 {
            last.timestamp() - first.timestamp()
        } else {
            0.0
        },
        distance_traveled,
        acceleration_bursts: detect_acceleration(events, ACCELERATION_BURST_THRESHOLD).len(),
    }
}

/// Indices `i` where `|speed[i] - speed[i-1]|` exceeds `threshold`.
pub fn detect_acceleration(events: &[PointerEvent], threshold: f64) -> Vec<usize> {
    events
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[1].speed() - pair[0].speed()).abs() > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}
