//! Court occupancy grid for coverage heatmaps.

use court_analytics_core::CourtModel;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Counts of court positions binned into a `cols x rows` grid spanning the
/// court. Cell `(0, 0)` touches the world origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageGrid {
    pub cols: usize,
    pub rows: usize,
    /// Row-major counts, `len = cols * rows`.
    pub counts: Vec<u32>,
    /// Positions that fell outside the court outline.
    pub outside: u32,
}

impl CoverageGrid {
    /// Bin `positions` over `court`. Returns `None` for an empty grid shape.
    pub fn from_positions(
        court: &CourtModel,
        cols: usize,
        rows: usize,
        positions: &[Point2<f64>],
    ) -> Option<Self> {
        if cols == 0 || rows == 0 {
            return None;
        }

        let mut grid = Self {
            cols,
            rows,
            counts: vec![0; cols * rows],
            outside: 0,
        };

        let cell_w = court.width_m / cols as f64;
        let cell_h = court.length_m / rows as f64;
        for p in positions {
            if !court.contains(*p) {
                grid.outside += 1;
                continue;
            }
            // far edges belong to the last cell
            let i = ((p.x / cell_w) as usize).min(cols - 1);
            let j = ((p.y / cell_h) as usize).min(rows - 1);
            grid.counts[j * cols + i] += 1;
        }
        Some(grid)
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<u32> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.counts.get(row * self.cols + col).copied()
    }

    /// Positions that landed inside the court.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}
