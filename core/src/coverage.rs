use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Paint accumulated on one lattice cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellState {
    /// Most recent paint, `None` until the cell is first visited.
    pub color: Option<Hsla>,
    pub accumulated_opacity: f64,
}

impl CellState {
    pub const fn is_visited(&self) -> bool {
        self.color.is_some()
    }
}

/// Accumulated paint for every cell of the lattice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageTracker {
    cells: Array2<CellState>,
}

impl Default for CoverageTracker {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CoverageTracker {
    pub fn new(grid_count: Coord) -> Self {
        let count = usize::from(grid_count);
        Self {
            cells: Array2::default([count, count]),
        }
    }

    /// Starts over with `grid_count²` untouched cells.
    pub fn reset(&mut self, grid_count: Coord) {
        *self = Self::new(grid_count);
    }

    pub fn grid_count(&self) -> Coord {
        self.cells.dim().0.try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&CellState> {
        self.cells.get(coords.to_nd_index())
    }

    /// Adds `increment` to the coverage of `coords` and remembers `color` as its latest paint.
    pub fn record(&mut self, coords: Coord2, color: Hsla, increment: f64) -> Result<f64> {
        let cell = self
            .cells
            .get_mut(coords.to_nd_index())
            .ok_or(WalkError::InvalidCoords)?;
        cell.color = Some(color);
        cell.accumulated_opacity += increment;
        Ok(cell.accumulated_opacity)
    }

    /// Whether every cell reached `minimum_opacity`.
    pub fn is_complete(&self, minimum_opacity: f64) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.accumulated_opacity >= minimum_opacity)
    }

    /// Lowest coverage over the lattice.
    pub fn min_opacity(&self) -> f64 {
        self.cells
            .iter()
            .map(|cell| cell.accumulated_opacity)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_visited()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint() -> Hsla {
        Hsla::new(0.0, 80.0, 75.0, 0.5)
    }

    #[test]
    fn reset_creates_untouched_square() {
        let mut tracker = CoverageTracker::new(2);
        tracker.record((1, 1), paint(), 0.5).unwrap();

        tracker.reset(3);

        assert_eq!(tracker.grid_count(), 3);
        assert_eq!(tracker.total_cells(), 9);
        assert_eq!(tracker.visited_count(), 0);
        assert_eq!(tracker.cell_at((1, 1)), Some(&CellState::default()));
    }

    #[test]
    fn record_accumulates_per_cell() {
        let mut tracker = CoverageTracker::new(3);

        assert_eq!(tracker.record((0, 1), paint(), 0.5), Ok(0.5));
        assert_eq!(tracker.record((0, 1), paint(), 0.5), Ok(1.0));
        assert_eq!(tracker.record((2, 2), paint(), 0.5), Ok(0.5));

        assert_eq!(tracker.cell_at((0, 1)).unwrap().color, Some(paint()));
        assert_eq!(tracker.cell_at((1, 0)).unwrap().accumulated_opacity, 0.0);
        assert_eq!(tracker.visited_count(), 2);
    }

    #[test]
    fn record_rejects_coords_outside_lattice() {
        let mut tracker = CoverageTracker::new(2);
        assert_eq!(
            tracker.record((2, 0), paint(), 1.0),
            Err(WalkError::InvalidCoords)
        );
    }

    #[test]
    fn zero_threshold_is_complete_before_any_visit() {
        let tracker = CoverageTracker::new(4);
        assert!(tracker.is_complete(0.0));
        assert!(!tracker.is_complete(0.1));
    }

    #[test]
    fn completes_once_every_cell_reaches_threshold() {
        let mut tracker = CoverageTracker::new(2);
        for coords in [(0, 0), (0, 1), (1, 0)] {
            tracker.record(coords, paint(), 1.0).unwrap();
            assert!(!tracker.is_complete(1.0));
        }
        tracker.record((1, 1), paint(), 1.0).unwrap();
        assert!(tracker.is_complete(1.0));
        assert_eq!(tracker.min_opacity(), 1.0);
    }

    #[test]
    fn infinite_threshold_never_completes() {
        let mut tracker = CoverageTracker::new(1);
        for _ in 0..1000 {
            tracker.record((0, 0), paint(), 1.0).unwrap();
        }
        assert!(!tracker.is_complete(f64::INFINITY));
    }
}
