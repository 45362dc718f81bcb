//! Spatial grids derived from an event stream's bounding box.

use crate::collector::types::PointerEvent;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// Padding added around the raw bounding box, in pixels.
pub const GRID_PADDING: i32 = 50;

/// Upper limit on `rows × columns` for one grid.
///
/// When the requested cell size would exceed it, the cell size is doubled
/// until the grid fits.
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// Bounds reported when there are no events to measure.
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    min_x: 0,
    min_y: 0,
    max_x: 1920,
    max_y: 1080,
};

/// Padded screen-space extent covered by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Layout of a grid over screen space.
///
/// Computed once per aggregation from the events' bounding box: the min
/// side is padded and clamped at 0, the max side is padded unclamped.
/// `cell_size` is the size actually used, which is coarser than the one
/// requested when the grid would otherwise exceed [`MAX_GRID_CELLS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub bounds: Bounds,
    pub cell_size: u32,
    pub columns: usize,
    pub rows: usize,
}

impl GridSpec {
    /// Build the grid layout for `events`, or `None` when there are none.
    ///
    /// A `cell_size` of 0 is treated as 1.
    pub fn from_events(events: &[PointerEvent], cell_size: u32) -> Option<Self> {
        let first = events.first()?;
        let requested = cell_size.max(1);

        let (mut min_x, mut min_y) = first.position();
        let (mut max_x, mut max_y) = first.position();
        for event in &events[1..] {
            min_x = min_x.min(event.x());
            min_y = min_y.min(event.y());
            max_x = max_x.max(event.x());
            max_y = max_y.max(event.y());
        }

        let bounds = Bounds {
            min_x: min_x.saturating_sub(GRID_PADDING).max(0),
            min_y: min_y.saturating_sub(GRID_PADDING).max(0),
            max_x: max_x.saturating_add(GRID_PADDING),
            max_y: max_y.saturating_add(GRID_PADDING),
        };

        let mut cell_size = requested;
        let (columns, rows) = loop {
            let columns = cells_along(bounds.min_x, bounds.max_x, cell_size);
            let rows = cells_along(bounds.min_y, bounds.max_y, cell_size);
            match columns.checked_mul(rows) {
                Some(cells) if cells <= MAX_GRID_CELLS => break (columns, rows),
                // Terminates: at u32::MAX any i32 span is at most 2 cells wide.
                _ => cell_size = cell_size.saturating_mul(2),
            }
        };
        if cell_size != requested {
            tracing::warn!(
                requested,
                cell_size,
                columns,
                rows,
                "event spread too wide for the requested cell size, using coarser cells"
            );
        }

        Some(Self {
            bounds,
            cell_size,
            columns,
            rows,
        })
    }

    /// Cell `(grid_x, grid_y)` containing a screen point, clamped into the grid.
    pub fn cell_of(&self, x: i32, y: i32) -> (usize, usize) {
        (
            clamp_index(x, self.bounds.min_x, self.cell_size, self.columns),
            clamp_index(y, self.bounds.min_y, self.cell_size, self.rows),
        )
    }

    /// Screen coordinates of a cell's top-left corner.
    pub fn cell_origin(&self, grid_x: usize, grid_y: usize) -> (i64, i64) {
        let size = i64::from(self.cell_size);
        (
            i64::from(self.bounds.min_x) + grid_x as i64 * size,
            i64::from(self.bounds.min_y) + grid_y as i64 * size,
        )
    }
}

/// `max(1, floor((max - min) / size) + 1)`
fn cells_along(min: i32, max: i32, size: u32) -> usize {
    let span = i64::from(max) - i64::from(min);
    usize::try_from((span.div_euclid(i64::from(size)) + 1).max(1)).unwrap_or(usize::MAX)
}

fn clamp_index(coord: i32, min: i32, size: u32, len: usize) -> usize {
    let index = (i64::from(coord) - i64::from(min)).div_euclid(i64::from(size));
    index.clamp(0, len.saturating_sub(1) as i64) as usize
}

/// Dense row-major 2-D array of shape `rows × columns`.
///
/// Serializes as nested arrays, one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Zero-initialized grid.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![T::default(); rows * columns],
        }
    }

    /// A grid with no cells.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn get(&self, grid_x: usize, grid_y: usize) -> Option<T> {
        if grid_x >= self.columns || grid_y >= self.rows {
            return None;
        }
        self.cells.get(grid_y * self.columns + grid_x).copied()
    }

    /// Mutable access to a cell. Panics on out-of-range indices.
    pub fn cell_mut(&mut self, grid_x: usize, grid_y: usize) -> &mut T {
        assert!(
            grid_x < self.columns && grid_y < self.rows,
            "cell ({grid_x}, {grid_y}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        &mut self.cells[grid_y * self.columns + grid_x]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.columns.max(1))
    }

    /// Map a row-major flat index back to `(grid_x, grid_y)`.
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (index % columns, index / columns)
    }
}

impl<T: Copy + Default + std::iter::Sum<T>> Grid<T> {
    pub fn sum(&self) -> T {
        self.cells.iter().copied().sum()
    }
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.chunks(self.columns.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> PointerEvent {
        PointerEvent::new(x, y, 0.0, false, 0.0).unwrap()
    }

    #[test]
    fn test_no_events_no_spec() {
        assert!(GridSpec::from_events(&[], 50).is_none());
    }

    #[test]
    fn test_padding_clamps_min_side_only() {
        let spec = GridSpec::from_events(&[at(10, 500), at(300, 700)], 50).unwrap();
        assert_eq!(
            spec.bounds,
            Bounds {
                min_x: 0,
                min_y: 450,
                max_x: 350,
                max_y: 750,
            }
        );
        // floor(350 / 50) + 1 and floor(300 / 50) + 1
        assert_eq!(spec.columns, 8);
        assert_eq!(spec.rows, 7);
    }

    #[test]
    fn test_cell_of_is_clamped() {
        let spec = GridSpec::from_events(&[at(100, 100)], 50).unwrap();
        assert_eq!(spec.cell_of(100, 100), (2, 2));
        assert_eq!(spec.cell_of(-1000, -1000), (0, 0));
        assert_eq!(spec.cell_of(10_000, 10_000), (spec.columns - 1, spec.rows - 1));
    }

    #[test]
    fn test_negative_coordinates_still_yield_a_cell() {
        let spec = GridSpec::from_events(&[at(-400, -400)], 50).unwrap();
        assert_eq!(spec.columns, 1);
        assert_eq!(spec.rows, 1);
        assert_eq!(spec.cell_of(-400, -400), (0, 0));
    }

    #[test]
    fn test_zero_cell_size_is_treated_as_one() {
        let spec = GridSpec::from_events(&[at(0, 0)], 0).unwrap();
        assert_eq!(spec.cell_size, 1);
        assert_eq!(spec.columns, 51);
    }

    #[test]
    fn test_wide_spread_coarsens_cells() {
        let spec = GridSpec::from_events(&[at(0, 0), at(1_000_000, 1_000_000)], 50).unwrap();
        assert!(spec.columns * spec.rows <= MAX_GRID_CELLS);
        assert!(spec.cell_size > 50);
        assert_eq!(spec.cell_of(1_000_000, 1_000_000), (spec.columns - 1, spec.rows - 1));
    }

    #[test]
    fn test_cell_size_kept_when_grid_fits() {
        let spec = GridSpec::from_events(&[at(0, 0), at(1919, 1079)], 1).unwrap();
        assert_eq!(spec.cell_size, 1);
        assert_eq!(spec.columns, 1970);
        assert_eq!(spec.rows, 1130);
    }

    #[test]
    fn test_extreme_coordinates_fit_the_cap() {
        let spec = GridSpec::from_events(&[at(i32::MIN, i32::MIN), at(i32::MAX, i32::MAX)], 1)
            .unwrap();
        assert_eq!(spec.bounds.min_x, 0);
        assert_eq!(spec.bounds.max_x, i32::MAX);
        assert!(spec.columns * spec.rows <= MAX_GRID_CELLS);
    }

    #[test]
    fn test_cell_origin() {
        let spec = GridSpec::from_events(&[at(500, 500)], 50).unwrap();
        assert_eq!(spec.cell_origin(2, 1), (550, 500));
    }

    #[test]
    fn test_grid_access_and_serialization() {
        let mut grid: Grid<u32> = Grid::new(2, 3);
        *grid.cell_mut(2, 1) += 4;
        assert_eq!(grid.get(2, 1), Some(4));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.sum(), 4);
        assert_eq!(grid.coords_of(5), (2, 1));

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[0,0,0],[0,0,4]]");
    }

    #[test]
    fn test_empty_grid() {
        let grid: Grid<f64> = Grid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.iter_rows().count(), 0);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[]");
    }
}
