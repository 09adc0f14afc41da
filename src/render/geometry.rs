//! Window-relative cell geometry.
//!
//! All coordinates are viewport pixels with the origin at the top-left of
//! the cell area. Frozen columns start at x = 0; scrolling columns start at
//! the frozen edge, shifted left by the leading column offset. Rows start
//! at y = -leading row offset.

use crate::layout::{ColumnSet, RowSet, Viewport};
use crate::types::{GridCellRef, Point, Rect};
use crate::viewer::{ColumnWindow, IndexSpan};

/// Read-only view over one window state.
#[derive(Debug, Clone, Copy)]
pub struct GeometryMapper<'a> {
    pub(crate) columns: &'a ColumnSet,
    pub(crate) rows: &'a RowSet,
    pub(crate) viewport: &'a Viewport,
    pub(crate) row_span: Option<IndexSpan>,
    pub(crate) lead_row: f32,
    pub(crate) col_window: ColumnWindow,
}

impl<'a> GeometryMapper<'a> {
    pub fn new(
        columns: &'a ColumnSet,
        rows: &'a RowSet,
        viewport: &'a Viewport,
        row_span: Option<IndexSpan>,
        lead_row: f32,
        col_window: ColumnWindow,
    ) -> Self {
        Self {
            columns,
            rows,
            viewport,
            row_span,
            lead_row,
            col_window,
        }
    }

    /// Top edge of a displayed row.
    pub fn row_top(&self, row: usize) -> Option<f32> {
        let span = self.row_span?;
        span.contains(row)
            .then(|| self.rows.height_sum(span.first, row) - self.lead_row)
    }

    /// Left edge of a displayed column, by display position.
    pub fn column_left(&self, pos: usize) -> Option<f32> {
        if !self.columns.column_at(pos).is_some_and(|c| c.is_visible()) {
            return None;
        }
        if pos < self.columns.frozen_count() {
            return Some(self.columns.left_of(pos));
        }
        let span = self.col_window.span?;
        span.contains(pos).then(|| {
            self.columns.frozen_width() - self.col_window.leading_offset
                + (self.columns.left_of(pos) - self.columns.left_of(span.first))
        })
    }

    /// Displayed display positions: visible frozen ones, then the
    /// visible scrolling ones in the window.
    pub fn displayed_positions(&self) -> impl Iterator<Item = usize> + 'a {
        let columns = self.columns;
        let scrolling = self.col_window.span.into_iter().flat_map(|s| s.iter());
        columns.frozen_positions().chain(
            scrolling.filter(move |&p| columns.column_at(p).is_some_and(|c| c.is_visible())),
        )
    }

    /// Rectangle of `cell` (column by identity), `None` outside the window.
    pub fn cell_rect(&self, cell: GridCellRef) -> Option<Rect> {
        let pos = self.columns.get(cell.col)?.display_index();
        let x = self.column_left(pos)?;
        let y = self.row_top(cell.row)?;
        Some(Rect::new(
            x,
            y,
            self.columns.width_at(pos),
            self.rows.height(cell.row),
        ))
    }

    /// Cell under `point`. Frozen columns are checked first since they
    /// draw over the scrolling ones.
    pub fn hit_test(&self, point: Point) -> Option<GridCellRef> {
        if point.x < 0.0
            || point.y < 0.0
            || point.x >= self.viewport.width
            || point.y >= self.viewport.height
        {
            return None;
        }
        let row = self.row_at(point.y)?;
        let pos = self.column_position_at(point.x)?;
        Some(GridCellRef::new(row, self.columns.id_at(pos)?))
    }

    fn row_at(&self, y: f32) -> Option<usize> {
        let span = self.row_span?;
        let mut top = -self.lead_row;
        for row in span.iter() {
            let bottom = top + self.rows.height(row);
            if y >= top && y < bottom {
                return Some(row);
            }
            top = bottom;
        }
        None
    }

    fn column_position_at(&self, x: f32) -> Option<usize> {
        for pos in self.columns.frozen_positions() {
            let left = self.columns.left_of(pos);
            if x >= left && x < left + self.columns.width_at(pos) {
                return Some(pos);
            }
        }
        let frozen_width = self.columns.frozen_width();
        if x < frozen_width {
            return None;
        }
        let span = self.col_window.span?;
        span.iter().find(|&pos| {
            self.column_left(pos)
                .is_some_and(|left| x >= left && x < left + self.columns.width_at(pos))
        })
    }
}
