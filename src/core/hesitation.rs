//! Ranking of hesitation zones.

use crate::core::aggregate::AggregateResult;
use serde::Serialize;
use std::cmp::Ordering;

/// Default number of zones reported.
pub const DEFAULT_TOP_ZONES: usize = 5;

/// A grid cell where the pointer lingered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HesitationZone {
    pub grid_x: usize,
    pub grid_y: usize,
    pub dwell_secs: f64,
}

impl HesitationZone {
    /// Screen coordinates of the zone's top-left corner in `result`.
    pub fn screen_origin(&self, result: &AggregateResult) -> (i64, i64) {
        match result.grid_spec() {
            Some(spec) => spec.cell_origin(self.grid_x, self.grid_y),
            None => (0, 0),
        }
    }
}

/// The `n` highest-dwell cells, highest first.
///
/// Ties keep row-major order. Cells with no dwell are never reported, so
/// fewer than `n` zones come back for quiet sessions.
pub fn top_zones(result: &AggregateResult, n: usize) -> Vec<HesitationZone> {
    let grid = &result.hesitation_grid;

    let mut ranked: Vec<(usize, f64)> = grid.cells().iter().copied().enumerate().collect();
    // Stable sort preserves index order among equal dwell values.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .take(n)
        .filter(|&(_, dwell)| dwell != 0.0)
        .map(|(index, dwell_secs)| {
            let (grid_x, grid_y) = grid.coords_of(index);
            HesitationZone {
                grid_x,
                grid_y,
                dwell_secs,
            }
        })
        .collect()
}
