//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on any
//! drawing API. A selection that extends past what is shown gets its
//! rectangle clipped, and the matching `hide_*` flag tells the renderer
//! not to draw a border on that side since the real edge is off-screen.

use serde::Serialize;

use super::geometry::GeometryMapper;
use crate::types::{GridCellRange, Rect, SelectionMode};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRect {
    pub rect: Rect,
    pub hide_left: bool,
    pub hide_top: bool,
    pub hide_right: bool,
    pub hide_bottom: bool,
}

impl GeometryMapper<'_> {
    /// Bounding overlay rectangle of `range` under `mode`.
    ///
    /// Range columns are identities, like every other [`GridCellRef`]; the
    /// block covers the display positions between its two corner columns.
    /// Whole-row mode spans every column, whole-column mode every row.
    /// `None` when nothing of the range is displayed.
    pub fn selection_rect(&self, range: &GridCellRange, mode: SelectionMode) -> Option<SelectionRect> {
        let row_count = self.rows.len();
        let col_count = self.columns.len();
        if row_count == 0 || col_count == 0 {
            return None;
        }
        let (r0, r1) = match mode {
            SelectionMode::Columns => (0, row_count - 1),
            _ => (range.top_left().row, range.bottom_right().row.min(row_count - 1)),
        };
        let (c0, c1) = match mode {
            SelectionMode::Rows => (0, col_count - 1),
            _ => {
                let a = self.columns.get(range.top_left().col.min(col_count - 1))?;
                let b = self.columns.get(range.bottom_right().col.min(col_count - 1))?;
                let (a, b) = (a.display_index(), b.display_index());
                (a.min(b), a.max(b))
            }
        };
        if r0 > r1 || c0 > c1 {
            return None;
        }

        // Vertical extent
        let span = self.row_span?;
        let first_row = r0.max(span.first);
        let last_row = r1.min(span.last);
        if first_row > last_row {
            return None;
        }
        let mut top = self.row_top(first_row)?;
        let mut bottom = self.row_top(last_row)? + self.rows.height(last_row);
        let mut hide_top = r0 < span.first;
        let mut hide_bottom = r1 > span.last;
        if top < 0.0 {
            top = 0.0;
            hide_top = true;
        }
        if bottom > self.viewport.height {
            bottom = self.viewport.height;
            hide_bottom = true;
        }

        // Horizontal extent over displayed positions inside the range
        let mut shown = self.displayed_positions().filter(|&p| (c0..=c1).contains(&p));
        let first_pos = shown.next()?;
        let last_pos = shown.last().unwrap_or(first_pos);
        let is_visible = |p: usize| self.columns.column_at(p).is_some_and(|c| c.is_visible());
        let range_first = (c0..=c1).find(|&p| is_visible(p));
        let range_last = (c0..=c1).rev().find(|&p| is_visible(p));

        let frozen_width = self.columns.frozen_width();
        let mut left = self.column_left(first_pos)?;
        let mut hide_left = range_first != Some(first_pos);
        if first_pos >= self.columns.frozen_count() && left < frozen_width {
            // Scrolled partly under the frozen columns.
            left = frozen_width;
            hide_left = true;
        }
        let mut right = self.column_left(last_pos)? + self.columns.width_at(last_pos);
        let mut hide_right = range_last != Some(last_pos);
        if right > self.viewport.width {
            right = self.viewport.width;
            hide_right = true;
        }

        if right <= left || bottom <= top {
            return None;
        }
        Some(SelectionRect {
            rect: Rect::new(left, top, right - left, bottom - top),
            hide_left,
            hide_top,
            hide_right,
            hide_bottom,
        })
    }
}
