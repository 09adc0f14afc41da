//! Viewport window manager.
//!
//! Rows are virtualized with visual reuse: moving the window by a few rows
//! only touches the rows entering or leaving it. Columns are recomputed
//! whole whenever the horizontal window changes; frozen columns are always
//! part of it and only the scrolling range moves.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::recycle::{RowArena, RowHandle};
use super::GridViewport;
use crate::layout::{measure_row, ColumnSet, SNAP_EPSILON};
use crate::render::RowPresenter;
use crate::source::GridSource;
use crate::types::Size;

/// Inclusive index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpan {
    pub first: usize,
    pub last: usize,
}

impl IndexSpan {
    /// `None` when `last < first`.
    pub fn new(first: usize, last: usize) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    pub fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    pub fn overlaps(&self, other: &IndexSpan) -> bool {
        other.last >= self.first && other.first <= self.last
    }

    /// Number of indices shared with `other`.
    pub fn overlap_len(&self, other: &IndexSpan) -> usize {
        if self.overlaps(other) {
            self.last.min(other.last) - self.first.max(other.first) + 1
        } else {
            0
        }
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Snapshot of what is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportWindow {
    /// Displayed row identities
    pub rows: Option<IndexSpan>,
    /// Displayed scrolling columns, as display positions
    pub cols: Option<IndexSpan>,
    /// Pixels of the first row above the viewport top
    pub leading_row_offset: f32,
    /// Pixels of the first scrolling column left of the scrolling region
    pub leading_col_offset: f32,
    /// Length of the frozen display prefix (always displayed)
    pub frozen_cols: usize,
}

impl ViewportWindow {
    pub fn first_row(&self) -> Option<usize> {
        self.rows.map(|s| s.first)
    }

    pub fn last_row(&self) -> Option<usize> {
        self.rows.map(|s| s.last)
    }

    pub fn first_col(&self) -> Option<usize> {
        self.cols.map(|s| s.first)
    }

    pub fn last_col(&self) -> Option<usize> {
        self.cols.map(|s| s.last)
    }
}

/// Presenter calls made by one `set_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowChange {
    pub materialized: usize,
    pub recycled: usize,
    pub rebuilt: bool,
}

impl WindowChange {
    pub fn is_empty(&self) -> bool {
        self.materialized == 0 && self.recycled == 0
    }
}

/// Displayed row visuals, head to tail in row order.
#[derive(Debug, Default)]
pub struct RowWindow {
    displayed: VecDeque<RowHandle>,
    span: Option<IndexSpan>,
    arena: RowArena,
    force_rebuild: bool,
}

impl RowWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn span(&self) -> Option<IndexSpan> {
        self.span
    }

    pub fn arena(&self) -> &RowArena {
        &self.arena
    }

    /// `(row, handle)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, RowHandle)> + '_ {
        self.span
            .into_iter()
            .flat_map(|s| s.iter())
            .zip(self.displayed.iter().copied())
    }

    pub fn handle_for(&self, row: usize) -> Option<RowHandle> {
        let span = self.span?;
        if !span.contains(row) {
            return None;
        }
        self.displayed.get(row - span.first).copied()
    }

    /// Make the next `set_window` rebuild from scratch.
    pub fn force_rebuild(&mut self) {
        self.force_rebuild = true;
    }

    /// Move the displayed rows to `new`, reusing every visual that stays.
    pub fn set_window(
        &mut self,
        new: Option<IndexSpan>,
        presenter: &mut dyn RowPresenter,
    ) -> WindowChange {
        let change = match (self.span, new) {
            (_, None) => WindowChange {
                recycled: self.recycle_all(presenter),
                rebuilt: true,
                materialized: 0,
            },
            (Some(old), Some(new)) if !self.force_rebuild && old.overlaps(&new) => {
                self.differential(old, new, presenter)
            }
            (_, Some(new)) => self.rebuild(new, presenter),
        };
        self.force_rebuild = false;
        if !change.is_empty() {
            debug!(
                target: "gridport::window",
                rows = ?self.span,
                materialized = change.materialized,
                recycled = change.recycled,
                rebuilt = change.rebuilt,
                pooled = self.arena.pooled(),
                "row window updated"
            );
        }
        change
    }

    fn rebuild(&mut self, new: IndexSpan, presenter: &mut dyn RowPresenter) -> WindowChange {
        let recycled = self.recycle_all(presenter);
        for row in new.iter() {
            let handle = self.arena.acquire(row, presenter);
            self.displayed.push_back(handle);
            presenter.on_row_materialized(self.displayed.len() - 1, handle, row);
        }
        self.span = Some(new);
        WindowChange {
            materialized: new.len(),
            recycled,
            rebuilt: true,
        }
    }

    fn differential(
        &mut self,
        old: IndexSpan,
        new: IndexSpan,
        presenter: &mut dyn RowPresenter,
    ) -> WindowChange {
        let mut change = WindowChange::default();
        let (mut first, mut last) = (old.first, old.last);

        // Trailing trim
        while last > new.last {
            if let Some(handle) = self.displayed.pop_back() {
                self.recycle(self.displayed.len(), handle, presenter);
                change.recycled += 1;
            }
            last -= 1;
        }
        // Trailing extend
        while last < new.last {
            last += 1;
            let handle = self.arena.acquire(last, presenter);
            self.displayed.push_back(handle);
            trace!(target: "gridport::window", row = last, slot = handle.index(), "materialize tail");
            presenter.on_row_materialized(self.displayed.len() - 1, handle, last);
            change.materialized += 1;
        }
        // Leading extend, closest to the old head first
        while first > new.first {
            first -= 1;
            let handle = self.arena.acquire(first, presenter);
            self.displayed.push_front(handle);
            trace!(target: "gridport::window", row = first, slot = handle.index(), "materialize head");
            presenter.on_row_materialized(0, handle, first);
            change.materialized += 1;
        }
        // Leading trim
        while first < new.first {
            if let Some(handle) = self.displayed.pop_front() {
                self.recycle(0, handle, presenter);
                change.recycled += 1;
            }
            first += 1;
        }

        self.span = Some(new);
        change
    }

    fn recycle(&mut self, display_index: usize, handle: RowHandle, presenter: &mut dyn RowPresenter) {
        trace!(target: "gridport::window", display_index, slot = handle.index(), "recycle");
        presenter.on_row_recycled(display_index, handle);
        self.arena.release(handle);
    }

    /// Recycle every displayed row, tail first. Returns how many.
    pub fn recycle_all(&mut self, presenter: &mut dyn RowPresenter) -> usize {
        let count = self.displayed.len();
        while let Some(handle) = self.displayed.pop_back() {
            self.recycle(self.displayed.len(), handle, presenter);
        }
        self.span = None;
        count
    }

    /// Recycle trailing rows so the window ends at `last`.
    pub fn trim_after(&mut self, last: usize, presenter: &mut dyn RowPresenter) {
        let Some(span) = self.span else {
            return;
        };
        if last < span.first {
            self.recycle_all(presenter);
            return;
        }
        let mut cur = span.last;
        while cur > last {
            if let Some(handle) = self.displayed.pop_back() {
                self.recycle(self.displayed.len(), handle, presenter);
            }
            cur -= 1;
        }
        self.span = IndexSpan::new(span.first, cur);
    }

    /// Shift every displayed identity so the head becomes `new_first`,
    /// keeping the visuals bound.
    pub fn renumber(&mut self, new_first: usize, presenter: &mut dyn RowPresenter) {
        let Some(span) = self.span else {
            return;
        };
        for (offset, &handle) in self.displayed.iter().enumerate() {
            let row = new_first + offset;
            self.arena.rebind(handle, row);
            presenter.on_row_reindexed(handle, row);
        }
        self.span = IndexSpan::new(new_first, new_first + span.len() - 1);
    }

    /// Recycle everything and drop all visuals.
    pub fn reset(&mut self, presenter: &mut dyn RowPresenter) {
        self.recycle_all(presenter);
        self.arena.clear(presenter);
        self.force_rebuild = false;
    }
}

/// Horizontal window over the scrolling columns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnWindow {
    /// Scrolling display positions; `None` when nothing scrolls into view
    pub span: Option<IndexSpan>,
    pub leading_offset: f32,
}

/// Scrolling columns that cover `scrolling_width`, starting from display
/// position `first` scrolled left by `lead` pixels.
///
/// When the walk runs out of columns before the width is covered, the
/// window grows backward: the leading offset shrinks first, then whole
/// previous columns are admitted, and a final partial column absorbs any
/// remainder.
pub fn compute_visible_columns(
    columns: &ColumnSet,
    scrolling_width: f32,
    first: Option<usize>,
    lead: f32,
) -> ColumnWindow {
    let Some(start) = first
        .filter(|&p| p >= columns.frozen_count())
        .and_then(|p| {
            if columns.column_at(p).is_some_and(|c| c.is_visible()) {
                Some(p)
            } else {
                columns.next_scrolling(p)
            }
        })
        .or_else(|| columns.first_scrolling())
    else {
        return ColumnWindow::default();
    };
    if scrolling_width <= 0.0 || scrolling_width.is_nan() {
        return ColumnWindow::default();
    }

    let mut first = start;
    let mut lead = if lead.is_finite() { lead.max(0.0) } else { 0.0 };
    while lead >= columns.width_at(first) {
        match columns.next_scrolling(first) {
            Some(next) => {
                lead -= columns.width_at(first);
                first = next;
            }
            None => {
                lead = 0.0;
                break;
            }
        }
    }

    let mut last = first;
    let mut covered = columns.width_at(first) - lead;
    while covered < scrolling_width {
        match columns.next_scrolling(last) {
            Some(next) => {
                covered += columns.width_at(next);
                last = next;
            }
            None => break,
        }
    }

    if covered < scrolling_width {
        let mut gap = scrolling_width - covered;
        let reveal = lead.min(gap);
        lead -= reveal;
        gap -= reveal;
        while gap > 0.0 {
            let Some(prev) = columns.prev_scrolling(first) else {
                break;
            };
            let width = columns.width_at(prev);
            first = prev;
            if width <= gap {
                gap -= width;
            } else {
                lead = width - gap;
                gap = 0.0;
            }
        }
    }

    ColumnWindow {
        span: IndexSpan::new(first, last),
        leading_offset: lead,
    }
}

impl GridViewport {
    /// Measure `row` if it has never been realized and something depends on
    /// its natural size.
    pub(crate) fn ensure_measured(&mut self, row: usize, source: &dyn GridSource) {
        if self.rows.is_measured(row) || row >= self.rows.len() {
            return;
        }
        let width = self.viewport.width;
        let needs_height = self.rows.actual_height(row).is_nan();
        if !needs_height && !self.columns.has_measured_columns(width) {
            return;
        }
        let m = measure_row(row, &self.rows, &self.columns, width, source);
        self.rows.set_measured(row, m.height);
        for (col, natural) in m.widths {
            self.columns.note_natural_width(col, natural);
        }
        self.fresh_rows.push(row);
    }

    /// Measure columns that appeared or became visible after the displayed
    /// rows were measured. Rows measured in this pass already cover them.
    pub(crate) fn measure_pending_columns(&mut self, source: &dyn GridSource) {
        let fresh = std::mem::take(&mut self.fresh_rows);
        let width = self.viewport.width;
        let pending = self.columns.pending_measure(width);
        if pending.is_empty() {
            return;
        }
        let mut cells = 0usize;
        if let Some(span) = self.row_window.span() {
            for row in span.iter() {
                if fresh.contains(&row) || !self.rows.is_measured(row) {
                    continue;
                }
                let height = self.rows.height_constraint(row);
                for &col in &pending {
                    let available = Size::new(self.columns.measure_constraint(col, width), height);
                    let natural = source.measure_cell(row, col, available);
                    self.columns.note_natural_width(col, natural.width);
                    cells += 1;
                }
            }
        }
        self.columns.mark_cells_measured(&pending);
        debug!(
            target: "gridport::columns",
            columns = ?pending,
            cells,
            "measured late columns"
        );
    }

    /// Walk rows from the anchor until the viewport height is covered and
    /// hand the result to the row window.
    pub(crate) fn update_row_window(
        &mut self,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) -> WindowChange {
        let count = self.rows.len();
        let height = self.viewport.height;
        if count == 0 || height <= 0.0 || height.is_nan() {
            self.first_row = 0;
            self.lead_row = 0.0;
            self.viewport.offset.vertical = 0.0;
            return self.row_window.set_window(None, presenter);
        }

        // Content shrank under the offset: pin the last row to the bottom.
        let max = self.viewport.max_vertical(self.rows.total_height());
        if self.viewport.offset.vertical > max + SNAP_EPSILON {
            self.first_row = count - 1;
            self.lead_row = 0.0;
        }

        let mut first = self.first_row.min(count - 1);
        let mut lead = if self.lead_row.is_finite() {
            self.lead_row.max(0.0)
        } else {
            0.0
        };
        self.ensure_measured(first, source);
        while lead >= self.rows.height(first) && first + 1 < count {
            lead -= self.rows.height(first);
            first += 1;
            self.ensure_measured(first, source);
        }
        lead = lead.min(self.rows.height(first));

        let mut last = first;
        let mut covered = self.rows.height(first) - lead;
        while covered < height && last + 1 < count {
            last += 1;
            self.ensure_measured(last, source);
            covered += self.rows.height(last);
        }

        if covered < height {
            // Reached the final row with space left: derive the window
            // backward from the bottom instead of forward from the anchor.
            let mut gap = height - covered;
            let reveal = lead.min(gap);
            lead -= reveal;
            gap -= reveal;
            while gap > 0.0 && first > 0 {
                first -= 1;
                self.ensure_measured(first, source);
                let h = self.rows.height(first);
                if h <= gap {
                    gap -= h;
                } else {
                    lead = h - gap;
                    gap = 0.0;
                }
            }
            self.viewport.offset.vertical = if first == 0 {
                lead
            } else {
                self.viewport.max_vertical(self.rows.total_height())
            };
        } else if first == 0 {
            self.viewport.offset.vertical = lead;
        }

        self.first_row = first;
        self.lead_row = lead;
        self.row_window
            .set_window(IndexSpan::new(first, last), presenter)
    }

    /// Recompute the scrolling column range from the horizontal anchor.
    pub(crate) fn update_column_window(&mut self) {
        let scrolling_width = self.viewport.scrolling_width(self.columns.frozen_width());
        let window = compute_visible_columns(
            &self.columns,
            scrolling_width,
            self.first_col,
            self.lead_col,
        );
        if window.span != self.col_window.span {
            debug!(
                target: "gridport::window",
                cols = ?window.span,
                lead = window.leading_offset,
                "column window rebuilt"
            );
        }
        self.col_window = window;
        match window.span {
            Some(span) => {
                self.first_col = Some(span.first);
                self.lead_col = window.leading_offset;
                self.viewport.offset.horizontal =
                    self.columns.scrolling_left(span.first) + window.leading_offset;
            }
            None => {
                self.lead_col = 0.0;
                self.viewport.offset.horizontal = 0.0;
            }
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
    use super::*;
    use crate::layout::ColumnDef;
    use crate::render::RenderTree;

    fn span(first: usize, last: usize) -> Option<IndexSpan> {
        IndexSpan::new(first, last)
    }

    #[test]
    fn first_window_is_a_rebuild() {
        let mut window = RowWindow::new();
        let mut tree = RenderTree::new();
        let change = window.set_window(span(0, 4), &mut tree);
        assert!(change.rebuilt);
        assert_eq!(change.materialized, 5);
        assert_eq!(tree.row_ids(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn differential_touches_only_the_edges() {
        let mut window = RowWindow::new();
        let mut tree = RenderTree::new();
        window.set_window(span(10, 19), &mut tree);
        let kept = window.handle_for(12).unwrap();

        let change = window.set_window(span(12, 21), &mut tree);
        assert!(!change.rebuilt);
        assert_eq!(change.materialized, 2);
        assert_eq!(change.recycled, 2);
        assert_eq!(window.handle_for(12), Some(kept));
        assert_eq!(tree.row_ids(), (12..=21).collect::<Vec<_>>());

        let change = window.set_window(span(9, 15), &mut tree);
        assert_eq!(change.materialized, 3);
        assert_eq!(change.recycled, 6);
        assert_eq!(tree.row_ids(), (9..=15).collect::<Vec<_>>());
    }

    #[test]
    fn disjoint_window_rebuilds_from_pool() {
        let mut window = RowWindow::new();
        let mut tree = RenderTree::new();
        window.set_window(span(0, 3), &mut tree);
        let change = window.set_window(span(100, 103), &mut tree);
        assert!(change.rebuilt);
        assert_eq!(change.recycled, 4);
        assert_eq!(change.materialized, 4);
        assert_eq!(window.arena().allocated(), 4);
        assert_eq!(tree.live_handles(), 4);
    }

    #[test]
    fn forced_rebuild_ignores_overlap() {
        let mut window = RowWindow::new();
        window.set_window(span(0, 3), &mut ());
        window.force_rebuild();
        let change = window.set_window(span(1, 4), &mut ());
        assert!(change.rebuilt);
        assert_eq!(change.materialized, 4);
    }

    #[test]
    fn renumber_keeps_visuals() {
        let mut window = RowWindow::new();
        let mut tree = RenderTree::new();
        window.set_window(span(2, 4), &mut tree);
        let head = window.handle_for(2).unwrap();
        window.renumber(5, &mut tree);
        assert_eq!(window.span(), span(5, 7));
        assert_eq!(window.handle_for(5), Some(head));
        assert_eq!(tree.row_ids(), vec![5, 6, 7]);
    }

    #[test]
    fn reset_releases_everything() {
        let mut window = RowWindow::new();
        let mut tree = RenderTree::new();
        window.set_window(span(0, 5), &mut tree);
        window.reset(&mut tree);
        assert_eq!(tree.live_handles(), 0);
        assert!(tree.rows().is_empty());
        assert_eq!(window.span(), None);
    }

    fn fixed_columns(widths: &[f32], frozen: usize) -> ColumnSet {
        let defs: Vec<_> = widths.iter().map(|&w| ColumnDef::fixed(w)).collect();
        let mut set = ColumnSet::from_defs(&defs).unwrap();
        set.set_frozen_count(frozen).unwrap();
        set.layout(f32::INFINITY, |_, _| 0.0);
        set
    }

    #[test]
    fn columns_walk_forward_and_keep_partial_lead() {
        let set = fixed_columns(&[100.0; 10], 0);
        let w = compute_visible_columns(&set, 250.0, Some(2), 30.0);
        assert_eq!(w.span, span(2, 4));
        assert_eq!(w.leading_offset, 30.0);
    }

    #[test]
    fn columns_fill_backward_at_the_end() {
        let set = fixed_columns(&[100.0; 5], 0);
        let w = compute_visible_columns(&set, 250.0, Some(4), 0.0);
        assert_eq!(w.span, span(2, 4));
        assert_eq!(w.leading_offset, 50.0);
    }

    #[test]
    fn column_window_skips_frozen_prefix() {
        let set = fixed_columns(&[50.0, 100.0, 100.0, 100.0], 1);
        let w = compute_visible_columns(&set, 150.0, Some(0), 0.0);
        assert_eq!(w.span, span(1, 2));
        let again = compute_visible_columns(&set, 150.0, Some(0), 0.0);
        assert_eq!(w, again);
    }

    #[test]
    fn no_scrolling_space_gives_empty_column_window() {
        let set = fixed_columns(&[100.0, 100.0], 0);
        let w = compute_visible_columns(&set, 0.0, None, 0.0);
        assert_eq!(w.span, None);
    }
}
