//! Scroll controller for `GridViewport`.
//!
//! Deltas move the window anchors (first row/column plus leading offset)
//! by walking track sizes, never by dividing by an average size. Targets
//! at either end snap, so estimation error in unmeasured rows cannot leave
//! a gap below the last row or above the first.

use tracing::trace;

use super::GridViewport;
use crate::error::{GridError, Result};
use crate::layout::SNAP_EPSILON;
use crate::render::RowPresenter;
use crate::source::GridSource;

/// Extra passes `scroll_row_into_view` may take when measuring newly
/// realized rows moves the target.
const MAX_INTO_VIEW_CORRECTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPlacement {
    Visible,
    Above,
    Below,
}

impl GridViewport {
    /// Scroll by a pixel delta on each axis, then lay out.
    pub fn scroll_by(
        &mut self,
        dx: f32,
        dy: f32,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) {
        self.apply_horizontal_delta(dx);
        self.apply_vertical_delta(dy);
        self.layout(source, presenter);
    }

    /// Scroll to absolute offsets through the delta path.
    pub fn set_scroll(
        &mut self,
        horizontal: f32,
        vertical: f32,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) {
        let offset = self.viewport.offset;
        self.scroll_by(
            horizontal - offset.horizontal,
            vertical - offset.vertical,
            source,
            presenter,
        );
    }

    /// Move the vertical anchor by `delta` pixels (positive scrolls down).
    pub(crate) fn apply_vertical_delta(&mut self, delta: f32) {
        let count = self.rows.len();
        if count == 0 || !delta.is_finite() || delta.abs() <= f32::EPSILON {
            return;
        }
        let max = self.viewport.max_vertical(self.rows.total_height());
        let current = self.viewport.offset.vertical;
        let target = (current + delta).clamp(0.0, max);

        if target <= SNAP_EPSILON {
            trace!(target: "gridport::scroll", "snap to top");
            self.first_row = 0;
            self.lead_row = 0.0;
            self.viewport.offset.vertical = 0.0;
            return;
        }
        if target >= max - SNAP_EPSILON {
            // The window is derived backward from the last row on layout.
            trace!(target: "gridport::scroll", max, "snap to bottom");
            self.first_row = count - 1;
            self.lead_row = 0.0;
            self.viewport.offset.vertical = max;
            return;
        }

        let mut first = self.first_row.min(count - 1);
        let mut remaining = self.lead_row + (target - current);
        if remaining >= 0.0 {
            while first + 1 < count && remaining >= self.rows.height(first) {
                remaining -= self.rows.height(first);
                first += 1;
            }
        } else {
            while remaining < 0.0 && first > 0 {
                first -= 1;
                remaining += self.rows.height(first);
            }
            remaining = remaining.max(0.0);
        }
        trace!(target: "gridport::scroll", target, first, lead = remaining, "vertical walk");
        self.first_row = first;
        self.lead_row = remaining;
        self.viewport.offset.vertical = target;
    }

    /// Move the horizontal anchor by `delta` pixels (positive scrolls right).
    pub(crate) fn apply_horizontal_delta(&mut self, delta: f32) {
        if !delta.is_finite() || delta.abs() <= f32::EPSILON {
            return;
        }
        let frozen_width = self.columns.frozen_width();
        let max = self
            .viewport
            .max_horizontal(self.columns.scrolling_width(), frozen_width);
        let current = self.viewport.offset.horizontal;
        let target = (current + delta).clamp(0.0, max);

        if target <= SNAP_EPSILON {
            self.first_col = self.columns.first_scrolling();
            self.lead_col = 0.0;
            self.viewport.offset.horizontal = 0.0;
            return;
        }
        if target >= max - SNAP_EPSILON {
            self.first_col = self.columns.last_scrolling();
            self.lead_col = 0.0;
            self.viewport.offset.horizontal = max;
            return;
        }

        let Some(mut first) = self
            .col_window
            .span
            .map(|s| s.first)
            .or_else(|| self.columns.first_scrolling())
        else {
            return;
        };
        let mut remaining = self.lead_col + (target - current);
        if remaining >= 0.0 {
            while remaining >= self.columns.width_at(first) {
                let Some(next) = self.columns.next_scrolling(first) else {
                    break;
                };
                remaining -= self.columns.width_at(first);
                first = next;
            }
        } else {
            while remaining < 0.0 {
                let Some(prev) = self.columns.prev_scrolling(first) else {
                    break;
                };
                first = prev;
                remaining += self.columns.width_at(first);
            }
            remaining = remaining.max(0.0);
        }
        trace!(target: "gridport::scroll", target, first, lead = remaining, "horizontal walk");
        self.first_col = Some(first);
        self.lead_col = remaining;
        self.viewport.offset.horizontal = target;
    }

    /// Move the vertical anchor to `(first, lead)`, shifting the absolute
    /// offset by the distance walked.
    fn move_row_anchor(&mut self, first: usize, lead: f32) {
        let old_first = self.first_row;
        let walked = if first >= old_first {
            self.rows.height_sum(old_first, first)
        } else {
            -self.rows.height_sum(first, old_first)
        };
        self.viewport.offset.vertical =
            (self.viewport.offset.vertical + walked - self.lead_row + lead).max(0.0);
        self.first_row = first;
        self.lead_row = lead;
    }

    fn row_placement(&self, row: usize) -> RowPlacement {
        let Some(span) = self.row_window.span() else {
            return RowPlacement::Visible;
        };
        if row < span.first {
            return RowPlacement::Above;
        }
        if row > span.last {
            return RowPlacement::Below;
        }
        let top = self.rows.height_sum(span.first, row) - self.lead_row;
        let height = self.rows.height(row);
        if top < -SNAP_EPSILON {
            RowPlacement::Above
        } else if top + height > self.viewport.height + SNAP_EPSILON && top > SNAP_EPSILON {
            RowPlacement::Below
        } else {
            RowPlacement::Visible
        }
    }

    /// Scroll the minimum distance that shows all of `row`.
    ///
    /// A row above the window is aligned to the top, one below to the
    /// bottom; a row taller than the viewport is aligned to the top.
    pub fn scroll_row_into_view(
        &mut self,
        row: usize,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) -> Result<()> {
        if row >= self.rows.len() {
            return Err(GridError::RowOutOfRange {
                row,
                count: self.rows.len(),
            });
        }
        self.layout(source, presenter);
        for _ in 0..=MAX_INTO_VIEW_CORRECTIONS {
            match self.row_placement(row) {
                RowPlacement::Visible => break,
                RowPlacement::Above => self.move_row_anchor(row, 0.0),
                RowPlacement::Below => {
                    let (first, lead) = self.bottom_anchor_for(row, source);
                    self.move_row_anchor(first, lead);
                }
            }
            self.layout(source, presenter);
        }
        Ok(())
    }

    /// Anchor that puts the bottom of `row` on the bottom of the viewport.
    fn bottom_anchor_for(&mut self, row: usize, source: &dyn GridSource) -> (usize, f32) {
        self.ensure_measured(row, source);
        let mut gap = self.viewport.height - self.rows.height(row);
        if gap <= 0.0 {
            return (row, 0.0);
        }
        let mut first = row;
        let mut lead = 0.0;
        while gap > 0.0 && first > 0 {
            first -= 1;
            self.ensure_measured(first, source);
            let height = self.rows.height(first);
            if height <= gap {
                gap -= height;
            } else {
                lead = height - gap;
                gap = 0.0;
            }
        }
        (first, lead)
    }

    /// Scroll horizontally so column `col` (identity) is fully shown.
    /// Frozen and hidden columns are left alone.
    pub fn scroll_column_into_view(
        &mut self,
        col: usize,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) -> Result<()> {
        let Some(column) = self.columns.get(col) else {
            return Err(GridError::ColumnOutOfRange {
                col,
                count: self.columns.len(),
            });
        };
        if !column.is_visible() || self.columns.is_frozen(col) {
            return Ok(());
        }
        let pos = column.display_index();
        self.layout(source, presenter);
        let Some(span) = self.col_window.span else {
            return Ok(());
        };

        let available = self.viewport.scrolling_width(self.columns.frozen_width());
        let width = self.columns.width_at(pos);
        let left = self.columns.scrolling_left(pos)
            - (self.columns.scrolling_left(span.first) + self.col_window.leading_offset);

        if left < -SNAP_EPSILON {
            self.first_col = Some(pos);
            self.lead_col = 0.0;
        } else if left + width > available + SNAP_EPSILON && left > SNAP_EPSILON {
            let mut gap = available - width;
            let mut first = pos;
            let mut lead = 0.0;
            while gap > 0.0 {
                let Some(prev) = self.columns.prev_scrolling(first) else {
                    break;
                };
                let w = self.columns.width_at(prev);
                first = prev;
                if w <= gap {
                    gap -= w;
                } else {
                    lead = w - gap;
                    gap = 0.0;
                }
            }
            self.first_col = Some(first);
            self.lead_col = lead;
        } else {
            return Ok(());
        }
        self.update_column_window();
        Ok(())
    }
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
    use crate::config::GridConfig;
    use crate::layout::{ColumnDef, RowSizing};
    use crate::source::GridSource;
    use crate::types::Size;
    use crate::viewer::GridViewport;

    struct Rows(usize);

    impl GridSource for Rows {
        fn row_count(&self) -> usize {
            self.0
        }

        fn column_count(&self) -> usize {
            1
        }

        fn measure_cell(&self, _row: usize, _col: usize, _available: Size) -> Size {
            Size::new(10.0, 10.0)
        }
    }

    fn grid(rows: usize, row_height: f32, viewport_height: f32) -> (GridViewport, Rows) {
        let config = GridConfig {
            row_sizing: RowSizing::Fixed(row_height),
            ..GridConfig::default()
        };
        let mut grid = GridViewport::with_columns(config, &[ColumnDef::fixed(100.0)]).unwrap();
        grid.resize(100.0, viewport_height).unwrap();
        let source = Rows(rows);
        grid.layout(&source, &mut ());
        (grid, source)
    }

    #[test]
    fn partial_delta_accumulates_in_lead() {
        let (mut grid, source) = grid(100, 30.0, 100.0);
        grid.scroll_by(0.0, 10.0, &source, &mut ());
        grid.scroll_by(0.0, 10.0, &source, &mut ());
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(0));
        assert_eq!(w.leading_row_offset, 20.0);
        grid.scroll_by(0.0, 10.0, &source, &mut ());
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(1));
        assert_eq!(w.leading_row_offset, 0.0);
    }

    #[test]
    fn scrolling_up_borrows_from_previous_row() {
        let (mut grid, source) = grid(100, 30.0, 100.0);
        grid.set_scroll(0.0, 90.0, &source, &mut ());
        assert_eq!(grid.current_window().first_row(), Some(3));
        grid.scroll_by(0.0, -5.0, &source, &mut ());
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(2));
        assert_eq!(w.leading_row_offset, 25.0);
        assert_eq!(grid.scroll_offset().vertical, 85.0);
    }

    #[test]
    fn negative_target_snaps_to_top() {
        let (mut grid, source) = grid(100, 30.0, 100.0);
        grid.set_scroll(0.0, 45.0, &source, &mut ());
        grid.scroll_by(0.0, -1000.0, &source, &mut ());
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(0));
        assert_eq!(w.leading_row_offset, 0.0);
        assert_eq!(grid.scroll_offset().vertical, 0.0);
    }

    #[test]
    fn row_below_is_aligned_to_bottom() {
        let (mut grid, source) = grid(100, 30.0, 100.0);
        grid.scroll_row_into_view(10, &source, &mut ()).unwrap();
        let w = grid.current_window();
        assert_eq!(w.last_row(), Some(10));
        assert_eq!(w.first_row(), Some(7));
        assert_eq!(w.leading_row_offset, 20.0);
        assert_eq!(grid.scroll_offset().vertical, 230.0);
    }

    #[test]
    fn row_above_is_aligned_to_top() {
        let (mut grid, source) = grid(100, 30.0, 100.0);
        grid.set_scroll(0.0, 600.0, &source, &mut ());
        grid.scroll_row_into_view(4, &source, &mut ()).unwrap();
        let w = grid.current_window();
        assert_eq!(w.first_row(), Some(4));
        assert_eq!(w.leading_row_offset, 0.0);
        assert_eq!(grid.scroll_offset().vertical, 120.0);
    }

    #[test]
    fn out_of_range_row_is_an_error() {
        let (mut grid, source) = grid(3, 30.0, 100.0);
        assert!(grid.scroll_row_into_view(3, &source, &mut ()).is_err());
    }
}
