//! Structural edits and count reconciliation for `GridViewport`.
//!
//! Rows inserted or removed strictly above the window shift the window's
//! identities and keep every visual bound. Edits that touch the window
//! recycle what became stale; column edits force the next row window
//! update to rebuild, since every displayed row shows the old columns.

use tracing::debug;

use super::GridViewport;
use crate::error::{GridError, Result};
use crate::layout::{ColumnDef, SizeConstraints, SizeSpec};
use crate::render::RowPresenter;
use crate::source::GridSource;

impl GridViewport {
    /// Insert `count` rows before identity `at`.
    pub fn insert_rows(
        &mut self,
        at: usize,
        count: usize,
        presenter: &mut dyn RowPresenter,
    ) -> Result<()> {
        self.rows.insert(at, count)?;
        if count > 0 {
            self.after_rows_inserted(at, count, presenter);
        }
        Ok(())
    }

    fn after_rows_inserted(&mut self, at: usize, count: usize, presenter: &mut dyn RowPresenter) {
        match self.row_window.span() {
            Some(span) if at <= span.first => {
                self.row_window.renumber(span.first + count, presenter);
                self.first_row = span.first + count;
                self.viewport.offset.vertical += self.rows.height_sum(at, at + count);
            }
            Some(span) if at <= span.last => {
                // Rows from `at` on now hold other identities.
                self.row_window.trim_after(at - 1, presenter);
            }
            _ => {}
        }
    }

    /// Remove rows `at..at + count`.
    pub fn remove_rows(
        &mut self,
        at: usize,
        count: usize,
        presenter: &mut dyn RowPresenter,
    ) -> Result<()> {
        let len = self.rows.len();
        let end = at.saturating_add(count);
        if end > len {
            return Err(GridError::InvalidRange {
                start: at,
                end,
                len,
            });
        }
        if count == 0 {
            return Ok(());
        }

        match self.row_window.span() {
            Some(span) if end <= span.first => {
                let removed = self.rows.remove(at, count)?;
                self.row_window.renumber(span.first - count, presenter);
                self.first_row = span.first - count;
                self.viewport.offset.vertical = (self.viewport.offset.vertical - removed).max(0.0);
            }
            Some(span) if at > span.last => {
                self.rows.remove(at, count)?;
            }
            Some(span) => {
                if at <= self.first_row {
                    let above = self.rows.height_sum(at, self.first_row) + self.lead_row;
                    self.viewport.offset.vertical = (self.viewport.offset.vertical - above).max(0.0);
                    self.first_row = at;
                    self.lead_row = 0.0;
                }
                self.rows.remove(at, count)?;
                self.row_window.recycle_all(presenter);
                self.row_window.force_rebuild();
                debug!(
                    target: "gridport::edits",
                    window = ?span,
                    at,
                    count,
                    "removed rows intersect the window, rebuilding"
                );
            }
            None => {
                self.rows.remove(at, count)?;
            }
        }
        self.first_row = self.first_row.min(self.rows.len().saturating_sub(1));
        Ok(())
    }

    /// Insert a column at identity `at`; identities from `at` shift up.
    pub fn insert_column(&mut self, at: usize, def: ColumnDef) -> Result<()> {
        self.columns.insert(at, def)?;
        self.keep_frozen_count();
        self.after_column_edit();
        Ok(())
    }

    /// Remove the column with identity `col`.
    pub fn remove_column(&mut self, col: usize) -> Result<()> {
        self.columns.remove(col)?;
        self.keep_frozen_count();
        self.after_column_edit();
        Ok(())
    }

    /// Move the column at display position `from` to display position `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        self.columns.move_to(from, to)?;
        self.after_column_edit();
        Ok(())
    }

    pub fn set_frozen_column_count(&mut self, count: usize) -> Result<()> {
        self.columns.set_frozen_count(count)?;
        self.keep_frozen_count();
        self.after_column_edit();
        Ok(())
    }

    pub fn set_column_visible(&mut self, col: usize, visible: bool) -> Result<()> {
        self.columns.set_visible(col, visible)?;
        self.after_column_edit();
        Ok(())
    }

    pub fn set_column_size(&mut self, col: usize, size: SizeSpec) -> Result<()> {
        self.columns.set_size(col, size)?;
        self.after_column_edit();
        Ok(())
    }

    pub fn set_column_bounds(&mut self, col: usize, min: f32, max: f32) -> Result<()> {
        self.columns.set_bounds(col, SizeConstraints::new(min, max)?)?;
        self.after_column_edit();
        Ok(())
    }

    /// Host edits redefine the configured frozen prefix; source count
    /// changes only clamp it.
    fn keep_frozen_count(&mut self) {
        self.config.frozen_column_count = self.columns.frozen_count();
    }

    fn after_column_edit(&mut self) {
        if self.first_col.is_some_and(|p| p >= self.columns.len()) {
            self.first_col = None;
            self.lead_col = 0.0;
        }
        self.row_window.force_rebuild();
    }

    /// Bring row and column counts in line with the source.
    ///
    /// Extra rows are appended or dropped from the end; extra columns are
    /// created from the configured default column.
    pub(crate) fn sync_counts(&mut self, source: &dyn GridSource, presenter: &mut dyn RowPresenter) {
        let wanted = source.row_count();
        let have = self.rows.len();
        if wanted > have {
            if self.rows.insert(have, wanted - have).is_ok() {
                self.after_rows_inserted(have, wanted - have, presenter);
            }
        } else if wanted < have {
            if let Err(err) = self.remove_rows(wanted, have - wanted, presenter) {
                debug!(target: "gridport::edits", %err, "row count sync failed");
            }
        }

        let wanted = source.column_count();
        let before = self.columns.len();
        while self.columns.len() < wanted {
            if self.columns.push(self.config.default_column).is_err() {
                break;
            }
        }
        while self.columns.len() > wanted {
            if self.columns.remove(self.columns.len() - 1).is_err() {
                break;
            }
        }
        if self.columns.len() != before {
            let frozen = self.config.frozen_column_count.min(self.columns.len());
            if frozen > self.columns.frozen_count() {
                // Columns created from the source may complete the configured prefix.
                if let Err(err) = self.columns.set_frozen_count(frozen) {
                    debug!(target: "gridport::edits", %err, "frozen prefix sync failed");
                }
            }
            debug!(
                target: "gridport::edits",
                before,
                after = self.columns.len(),
                "column count synced"
            );
            self.after_column_edit();
        }
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
    use crate::layout::{RowSizing, SizeSpec};
    use crate::render::RenderTree;
    use crate::source::GridSource;
    use crate::types::Size;
    use crate::viewer::{GridViewport, IndexSpan};

    struct Table {
        rows: usize,
        cols: usize,
    }

    impl GridSource for Table {
        fn row_count(&self) -> usize {
            self.rows
        }

        fn column_count(&self) -> usize {
            self.cols
        }

        fn measure_cell(&self, _row: usize, _col: usize, _available: Size) -> Size {
            Size::new(40.0, 20.0)
        }
    }

    fn setup(rows: usize) -> (GridViewport, Table, RenderTree) {
        let config = GridConfig {
            row_sizing: RowSizing::Fixed(20.0),
            ..GridConfig::default()
        };
        let mut grid = GridViewport::new(config).unwrap();
        grid.resize(300.0, 100.0).unwrap();
        let source = Table { rows, cols: 3 };
        let mut tree = RenderTree::new();
        grid.layout(&source, &mut tree);
        (grid, source, tree)
    }

    #[test]
    fn source_columns_use_default_definition() {
        let (grid, _, _) = setup(10);
        assert_eq!(grid.columns().len(), 3);
        assert_eq!(grid.columns().total_width(), 300.0);
    }

    #[test]
    fn insert_above_window_shifts_without_rebinding() {
        let (mut grid, mut source, mut tree) = setup(100);
        grid.set_scroll(0.0, 200.0, &source, &mut tree);
        assert_eq!(grid.current_window().rows, IndexSpan::new(10, 14));
        let (made, _) = tree.event_counts();

        grid.insert_rows(2, 3, &mut tree).unwrap();
        source.rows += 3;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.current_window().rows, IndexSpan::new(13, 17));
        assert_eq!(tree.event_counts().0, made);
        assert_eq!(tree.row_ids(), (13..=17).collect::<Vec<_>>());
        assert_eq!(grid.scroll_offset().vertical, 260.0);
    }

    #[test]
    fn remove_inside_window_rebuilds() {
        let (mut grid, mut source, mut tree) = setup(100);
        grid.set_scroll(0.0, 200.0, &source, &mut tree);
        grid.remove_rows(11, 2, &mut tree).unwrap();
        assert_eq!(grid.current_window().rows, None);
        source.rows -= 2;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.current_window().rows, IndexSpan::new(10, 14));
        assert_eq!(tree.row_ids(), (10..=14).collect::<Vec<_>>());
    }

    #[test]
    fn source_shrink_clamps_window() {
        let (mut grid, mut source, mut tree) = setup(100);
        grid.set_scroll(0.0, 1900.0, &source, &mut tree);
        source.rows = 8;
        grid.layout(&source, &mut tree);
        let w = grid.current_window();
        assert_eq!(w.rows, IndexSpan::new(3, 7));
        assert_eq!(grid.scroll_offset().vertical, 60.0);
        assert_eq!(tree.row_ids(), (3..=7).collect::<Vec<_>>());
    }

    #[test]
    fn frozen_prefix_survives_a_column_count_dip() {
        let config = GridConfig {
            row_sizing: RowSizing::Fixed(20.0),
            frozen_column_count: 2,
            ..GridConfig::default()
        };
        let mut grid = GridViewport::new(config).unwrap();
        grid.resize(300.0, 100.0).unwrap();
        let mut source = Table { rows: 10, cols: 4 };
        let mut tree = RenderTree::new();
        grid.layout(&source, &mut tree);
        assert_eq!(grid.columns().frozen_count(), 2);

        source.cols = 1;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.columns().frozen_count(), 1);
        assert_eq!(grid.config().frozen_column_count, 2);

        source.cols = 4;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.columns().frozen_count(), 2);
        assert_eq!(grid.current_window().frozen_cols, 2);
    }

    #[test]
    fn explicit_column_removal_updates_configured_prefix() {
        let (mut grid, mut source, mut tree) = setup(10);
        grid.set_frozen_column_count(2).unwrap();
        grid.remove_column(0).unwrap();
        source.cols = 2;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.config().frozen_column_count, 1);
        assert_eq!(grid.columns().frozen_count(), 1);
    }

    #[test]
    fn column_size_edit_rebuilds_rows() {
        let (mut grid, source, mut tree) = setup(10);
        let (made, recycled) = tree.event_counts();
        grid.set_column_size(0, SizeSpec::Fixed(60.0)).unwrap();
        grid.layout(&source, &mut tree);
        assert_eq!(tree.event_counts(), (made + 5, recycled + 5));
        assert_eq!(grid.columns().get(0).unwrap().actual_width(), 60.0);
    }

    #[test]
    fn removing_everything_empties_the_window() {
        let (mut grid, mut source, mut tree) = setup(5);
        source.rows = 0;
        grid.layout(&source, &mut tree);
        assert_eq!(grid.current_window().rows, None);
        assert!(tree.rows().is_empty());
        assert!(grid.remove_rows(0, 1, &mut tree).is_err());
    }
}
