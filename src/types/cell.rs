use serde::{Deserialize, Serialize};
use std::fmt;

use super::SelectionMode;

/// Reference to a single cell by row and column identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCellRef {
    pub row: usize,
    pub col: usize,
}

impl GridCellRef {
    /// Sentinel for hosts that keep "no current cell" in-band.
    pub const INVALID: GridCellRef = GridCellRef {
        row: usize::MAX,
        col: usize::MAX,
    };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for GridCellRef {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for GridCellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "R{}C{}", self.row, self.col)
        } else {
            f.write_str("<invalid>")
        }
    }
}

/// Normalized rectangular block of cells (inclusive on both corners).
///
/// Corners carry column identities, the same coordinates `hit_test` returns.
/// Overlay geometry spans the display positions between the corner columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCellRange {
    top_left: GridCellRef,
    bottom_right: GridCellRef,
}

impl GridCellRange {
    /// Build a range from any two corners.
    pub fn new(a: GridCellRef, b: GridCellRef) -> Self {
        Self {
            top_left: GridCellRef::new(a.row.min(b.row), a.col.min(b.col)),
            bottom_right: GridCellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn single(cell: GridCellRef) -> Self {
        Self::new(cell, cell)
    }

    /// Rows `first..=last`; columns are ignored in row mode.
    pub fn rows(first: usize, last: usize) -> Self {
        Self::new(GridCellRef::new(first, 0), GridCellRef::new(last, 0))
    }

    /// Columns `first..=last`; rows are ignored in column mode.
    pub fn columns(first: usize, last: usize) -> Self {
        Self::new(GridCellRef::new(0, first), GridCellRef::new(0, last))
    }

    pub fn top_left(&self) -> GridCellRef {
        self.top_left
    }

    pub fn bottom_right(&self) -> GridCellRef {
        self.bottom_right
    }

    pub fn row_count(&self) -> usize {
        self.bottom_right.row - self.top_left.row + 1
    }

    pub fn col_count(&self) -> usize {
        self.bottom_right.col - self.top_left.col + 1
    }

    /// Whether `cell` is selected by this range under `mode`.
    ///
    /// Columns compare by identity; once columns are reordered use
    /// `GridViewport::is_selected`, which compares display positions.
    pub fn contains(&self, cell: GridCellRef, mode: SelectionMode) -> bool {
        let in_rows = (self.top_left.row..=self.bottom_right.row).contains(&cell.row);
        let in_cols = (self.top_left.col..=self.bottom_right.col).contains(&cell.col);
        match mode {
            SelectionMode::Block => in_rows && in_cols,
            SelectionMode::Rows => in_rows,
            SelectionMode::Columns => in_cols,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn range_normalizes_corners() {
        let r = GridCellRange::new(GridCellRef::new(5, 1), GridCellRef::new(2, 4));
        assert_eq!(r.top_left(), GridCellRef::new(2, 1));
        assert_eq!(r.bottom_right(), GridCellRef::new(5, 4));
        assert_eq!(r.row_count(), 4);
        assert_eq!(r.col_count(), 4);
    }

    #[test]
    fn containment_follows_mode() {
        let r = GridCellRange::new(GridCellRef::new(1, 1), GridCellRef::new(2, 2));
        let outside_col = GridCellRef::new(1, 7);
        assert!(!r.contains(outside_col, SelectionMode::Block));
        assert!(r.contains(outside_col, SelectionMode::Rows));
        assert!(!r.contains(outside_col, SelectionMode::Columns));
        assert!(r.contains(GridCellRef::new(9, 2), SelectionMode::Columns));
    }

    #[test]
    fn invalid_sentinel() {
        assert!(!GridCellRef::default().is_valid());
        assert!(GridCellRef::new(0, 0).is_valid());
        assert_eq!(GridCellRef::INVALID.to_string(), "<invalid>");
    }
}
