//! Row model and per-row height resolution.
//!
//! Rows are a flat sequence whose identity is their position. A row's height
//! is, in order of precedence: its explicit override, the global fixed
//! height, its measured natural height, or the configured estimate while it
//! has never been realized. The running content height is kept incrementally
//! so scroll bounds never need a full walk.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::columns::ColumnSet;
use crate::error::{GridError, Result};
use crate::source::GridSource;
use crate::types::Size;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 22.0;

/// Global row height policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "height", rename_all = "camelCase")]
pub enum RowSizing {
    /// Every row is this tall unless overridden.
    Fixed(f32),
    /// Rows are as tall as their tallest cell.
    Auto,
}

impl Default for RowSizing {
    fn default() -> Self {
        RowSizing::Fixed(DEFAULT_ROW_HEIGHT)
    }
}

impl RowSizing {
    pub fn validate(&self) -> Result<()> {
        match *self {
            RowSizing::Fixed(h) if !h.is_finite() || h <= 0.0 => {
                Err(GridError::InvalidSize(format!("fixed row height {h}")))
            }
            _ => Ok(()),
        }
    }
}

/// Per-row sizing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    explicit_height: Option<f32>,
    /// NaN until the row has been measured
    natural_height: f32,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            explicit_height: None,
            natural_height: f32::NAN,
        }
    }
}

impl Row {
    pub fn explicit_height(&self) -> Option<f32> {
        self.explicit_height
    }

    pub fn is_measured(&self) -> bool {
        !self.natural_height.is_nan()
    }

    pub fn natural_height(&self) -> Option<f32> {
        self.is_measured().then_some(self.natural_height)
    }
}

/// Flat, ordered row sequence with incremental height bookkeeping.
#[derive(Debug, Clone)]
pub struct RowSet {
    rows: Vec<Row>,
    sizing: RowSizing,
    estimate: f32,
    /// Σ height(i), kept in f64 so long edit sequences do not drift
    total: f64,
}

impl Default for RowSet {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            sizing: RowSizing::default(),
            estimate: DEFAULT_ROW_HEIGHT,
            total: 0.0,
        }
    }
}

impl RowSet {
    pub fn new(sizing: RowSizing, estimate: f32) -> Result<Self> {
        sizing.validate()?;
        validate_estimate(estimate)?;
        Ok(Self {
            sizing,
            estimate,
            ..Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn sizing(&self) -> RowSizing {
        self.sizing
    }

    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    pub fn set_sizing(&mut self, sizing: RowSizing) -> Result<()> {
        sizing.validate()?;
        self.sizing = sizing;
        self.recompute_total();
        Ok(())
    }

    pub fn set_estimate(&mut self, estimate: f32) -> Result<()> {
        validate_estimate(estimate)?;
        self.estimate = estimate;
        self.recompute_total();
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(GridError::RowOutOfRange {
                row,
                count: self.rows.len(),
            })
        }
    }

    fn height_of(&self, row: &Row) -> f32 {
        if let Some(h) = row.explicit_height {
            return h;
        }
        match self.sizing {
            RowSizing::Fixed(h) => h,
            RowSizing::Auto if row.is_measured() => row.natural_height,
            RowSizing::Auto => self.estimate,
        }
    }

    /// Effective height used for layout (estimate for unmeasured auto rows).
    pub fn height(&self, row: usize) -> f32 {
        self.rows.get(row).map_or(0.0, |r| self.height_of(r))
    }

    /// Resolved height, or NaN while an auto row has not been measured.
    pub fn actual_height(&self, row: usize) -> f32 {
        match self.rows.get(row) {
            Some(r) if r.explicit_height.is_some() || matches!(self.sizing, RowSizing::Fixed(_)) => {
                self.height_of(r)
            }
            Some(r) if r.is_measured() => r.natural_height,
            _ => f32::NAN,
        }
    }

    pub fn is_measured(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(Row::is_measured)
    }

    /// Height bound handed to the cell measurement callback.
    pub fn height_constraint(&self, row: usize) -> f32 {
        match self.rows.get(row).and_then(|r| r.explicit_height) {
            Some(h) => h,
            None => match self.sizing {
                RowSizing::Fixed(h) => h,
                RowSizing::Auto => f32::INFINITY,
            },
        }
    }

    /// Sum of effective heights over `start..end` (clamped to the data).
    #[allow(clippy::cast_possible_truncation)]
    pub fn height_sum(&self, start: usize, end: usize) -> f32 {
        let end = end.min(self.rows.len());
        if start >= end {
            return 0.0;
        }
        let sum: f64 = self.rows.get(start..end).map_or(0.0, |rows| {
            rows.iter().map(|r| f64::from(self.height_of(r))).sum()
        });
        sum as f32
    }

    /// Total content height.
    #[allow(clippy::cast_possible_truncation)]
    pub fn total_height(&self) -> f32 {
        self.total.max(0.0) as f32
    }

    fn update_row<F>(&mut self, row: usize, f: F)
    where
        F: FnOnce(&mut Row),
    {
        let Some(r) = self.rows.get(row).copied() else {
            return;
        };
        let before = self.height_of(&r);
        let mut updated = r;
        f(&mut updated);
        let after = self.height_of(&updated);
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = updated;
        }
        self.total += f64::from(after) - f64::from(before);
    }

    /// Set or clear a per-row override.
    pub fn set_explicit_height(&mut self, row: usize, height: Option<f32>) -> Result<()> {
        self.check_row(row)?;
        if let Some(h) = height {
            if !h.is_finite() || h < 0.0 {
                return Err(GridError::InvalidSize(format!("row height {h}")));
            }
        }
        self.update_row(row, |r| r.explicit_height = height);
        Ok(())
    }

    /// Store a measured natural height.
    pub fn set_measured(&mut self, row: usize, height: f32) {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.update_row(row, |r| r.natural_height = height);
    }

    /// Forget every measurement; auto rows fall back to the estimate.
    pub fn clear_measurements(&mut self) {
        for row in &mut self.rows {
            row.natural_height = f32::NAN;
        }
        self.recompute_total();
    }

    /// Insert `count` fresh rows before identity `at`.
    pub fn insert(&mut self, at: usize, count: usize) -> Result<()> {
        if at > self.rows.len() {
            return Err(GridError::InvalidRange {
                start: at,
                end: at + count,
                len: self.rows.len(),
            });
        }
        let fresh = Row::default();
        let added = f64::from(self.height_of(&fresh)) * count as f64;
        self.rows.splice(at..at, std::iter::repeat(fresh).take(count));
        self.total += added;
        Ok(())
    }

    /// Remove rows `at..at + count`, returning the height they occupied.
    pub fn remove(&mut self, at: usize, count: usize) -> Result<f32> {
        let end = at.saturating_add(count);
        if end > self.rows.len() {
            return Err(GridError::InvalidRange {
                start: at,
                end,
                len: self.rows.len(),
            });
        }
        let removed = self.height_sum(at, end);
        self.rows.drain(at..end);
        self.total -= f64::from(removed);
        if self.rows.is_empty() {
            self.total = 0.0;
        }
        Ok(removed)
    }

    fn recompute_total(&mut self) {
        self.total = self.rows.iter().map(|r| f64::from(self.height_of(r))).sum();
    }
}

fn validate_estimate(estimate: f32) -> Result<()> {
    if estimate.is_finite() && estimate > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidSize(format!("estimated row height {estimate}")))
    }
}

/// Natural sizes gathered for one realized row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowMeasurement {
    /// Tallest cell
    pub height: f32,
    /// `(column identity, natural width)` per measured column
    pub widths: Vec<(usize, f32)>,
}

/// Measure every visible column of `row`, calling the host once per column.
pub fn measure_row(
    row: usize,
    rows: &RowSet,
    columns: &ColumnSet,
    available_width: f32,
    source: &dyn GridSource,
) -> RowMeasurement {
    let height_constraint = rows.height_constraint(row);
    let mut measurement = RowMeasurement::default();
    for col in columns.iter_display().filter(|c| c.is_visible()) {
        let available = Size::new(
            columns.measure_constraint(col.id(), available_width),
            height_constraint,
        );
        let natural = source.measure_cell(row, col.id(), available);
        if natural.height.is_finite() {
            measurement.height = measurement.height.max(natural.height);
        }
        measurement.widths.push((col.id(), natural.width));
    }
    trace!(
        target: "gridport::rows",
        row,
        height = measurement.height,
        cells = measurement.widths.len(),
        "measured row"
    );
    measurement
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn fixed_rows(count: usize, height: f32) -> RowSet {
        let mut rows = RowSet::new(RowSizing::Fixed(height), DEFAULT_ROW_HEIGHT).unwrap();
        rows.insert(0, count).unwrap();
        rows
    }

    #[test]
    fn fixed_height_with_override() {
        let mut rows = fixed_rows(5, 30.0);
        assert_eq!(rows.total_height(), 150.0);
        rows.set_explicit_height(2, Some(50.0)).unwrap();
        assert_eq!(rows.height(2), 50.0);
        assert_eq!(rows.actual_height(2), 50.0);
        assert_eq!(rows.total_height(), 170.0);
        rows.set_explicit_height(2, None).unwrap();
        assert_eq!(rows.total_height(), 150.0);
    }

    #[test]
    fn auto_rows_use_estimate_until_measured() {
        let mut rows = RowSet::new(RowSizing::Auto, 20.0).unwrap();
        rows.insert(0, 3).unwrap();
        assert!(rows.actual_height(0).is_nan());
        assert_eq!(rows.height(0), 20.0);
        assert_eq!(rows.total_height(), 60.0);

        rows.set_measured(0, 35.0);
        assert_eq!(rows.actual_height(0), 35.0);
        assert_eq!(rows.total_height(), 75.0);

        rows.clear_measurements();
        assert!(!rows.is_measured(0));
        assert_eq!(rows.total_height(), 60.0);
    }

    #[test]
    fn override_beats_measurement() {
        let mut rows = RowSet::new(RowSizing::Auto, 20.0).unwrap();
        rows.insert(0, 1).unwrap();
        rows.set_measured(0, 35.0);
        rows.set_explicit_height(0, Some(12.0)).unwrap();
        assert_eq!(rows.height(0), 12.0);
        assert_eq!(rows.height_constraint(0), 12.0);
    }

    #[test]
    fn insert_and_remove_track_total() {
        let mut rows = fixed_rows(4, 10.0);
        rows.insert(1, 2).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows.total_height(), 60.0);
        let removed = rows.remove(0, 3).unwrap();
        assert_eq!(removed, 30.0);
        assert_eq!(rows.total_height(), 30.0);
        assert!(rows.remove(2, 5).is_err());
        assert!(rows.insert(10, 1).is_err());
    }

    #[test]
    fn rejects_invalid_heights() {
        assert!(RowSet::new(RowSizing::Fixed(0.0), 20.0).is_err());
        assert!(RowSet::new(RowSizing::Auto, f32::NAN).is_err());
        let mut rows = fixed_rows(1, 10.0);
        assert!(rows.set_explicit_height(0, Some(-1.0)).is_err());
        assert!(rows.set_explicit_height(3, Some(1.0)).is_err());
    }

    #[test]
    fn sizing_json_shape() {
        let s: RowSizing = serde_json::from_str(r#"{"mode":"fixed","height":30}"#).unwrap();
        assert_eq!(s, RowSizing::Fixed(30.0));
        let s: RowSizing = serde_json::from_str(r#"{"mode":"auto"}"#).unwrap();
        assert_eq!(s, RowSizing::Auto);
    }
}
