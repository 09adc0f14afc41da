//! Sizing passes for columns and rows, plus viewport/scroll state.
//!
//! This module handles:
//! - Resolving fixed, auto and proportional size requests
//! - Two-pass star sizing across columns, with a frozen display prefix
//! - Row heights from fixed values, overrides or measurement
//! - Scroll bounds for a finite viewport

pub mod columns;
pub mod rows;
pub mod size_spec;
mod viewport;

pub use columns::{Column, ColumnDef, ColumnPass, ColumnSet, DEFAULT_COL_WIDTH, MIN_COL_WIDTH};
pub use rows::{measure_row, Row, RowMeasurement, RowSet, RowSizing, DEFAULT_ROW_HEIGHT};
pub use size_spec::{Resolution, SizeConstraints, SizeSpec};
pub use viewport::{ScrollOffset, Viewport, SNAP_EPSILON};
