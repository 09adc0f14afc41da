//! Host data interface.
//!
//! The engine never sees row items. It asks the host for counts and for the
//! natural size of a cell; the row identity is the key the host uses to find
//! its own item inside these callbacks.

use crate::types::Size;

/// Ordered data source plus per-cell measurement, supplied by the host.
///
/// `measure_cell` is only called for rows inside the current window, and at
/// most once per column per row between measurement invalidations.
pub trait GridSource {
    /// Number of rows; identities are `0..row_count()`.
    fn row_count(&self) -> usize;

    /// Number of columns the data exposes.
    ///
    /// Columns past the engine's own definitions are created from the
    /// configured default column.
    fn column_count(&self) -> usize;

    /// Natural size of cell `(row, col)` within `available` space.
    fn measure_cell(&self, row: usize, col: usize, available: Size) -> Size;

    /// Natural size of column `col`'s header; no header by default.
    fn measure_header(&self, _col: usize, _available: Size) -> Size {
        Size::ZERO
    }
}
