//! Render-tree synchronization hooks.

use crate::viewer::RowHandle;

/// Receives every change the window manager makes to the displayed rows.
///
/// `display_index` is the position inside the displayed row list at the
/// moment of the call, so a host that inserts/removes at that index keeps
/// its render tree in lockstep with the window.
pub trait RowPresenter {
    /// `handle` now shows `row` and was inserted at `display_index`.
    fn on_row_materialized(&mut self, display_index: usize, handle: RowHandle, row: usize);

    /// `handle` was removed from `display_index` and returned to the pool.
    fn on_row_recycled(&mut self, display_index: usize, handle: RowHandle);

    /// A brand-new visual was created for `handle`.
    fn on_handle_allocated(&mut self, _handle: RowHandle) {}

    /// `handle` is gone for good (visual teardown).
    fn on_handle_released(&mut self, _handle: RowHandle) {}

    /// A displayed row kept its visual but its identity shifted after an
    /// insert or remove above it.
    fn on_row_reindexed(&mut self, _handle: RowHandle, _row: usize) {}
}

/// No-op presenter for headless layout.
impl RowPresenter for () {
    fn on_row_materialized(&mut self, _display_index: usize, _handle: RowHandle, _row: usize) {}

    fn on_row_recycled(&mut self, _display_index: usize, _handle: RowHandle) {}
}

/// In-memory render tree mirroring the displayed rows.
///
/// Useful for headless hosts and for checking that window and render-tree
/// bookkeeping never diverge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderTree {
    rows: Vec<(RowHandle, usize)>,
    live_handles: usize,
    materialized: usize,
    recycled: usize,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(handle, row)` pairs in display order.
    pub fn rows(&self) -> &[(RowHandle, usize)] {
        &self.rows
    }

    /// Row identities in display order.
    pub fn row_ids(&self) -> Vec<usize> {
        self.rows.iter().map(|&(_, row)| row).collect()
    }

    pub fn live_handles(&self) -> usize {
        self.live_handles
    }

    /// Materialize and recycle calls seen so far.
    pub fn event_counts(&self) -> (usize, usize) {
        (self.materialized, self.recycled)
    }
}

impl RowPresenter for RenderTree {
    fn on_row_materialized(&mut self, display_index: usize, handle: RowHandle, row: usize) {
        let at = display_index.min(self.rows.len());
        self.rows.insert(at, (handle, row));
        self.materialized += 1;
    }

    fn on_row_recycled(&mut self, display_index: usize, handle: RowHandle) {
        match self.rows.get(display_index) {
            Some(&(h, _)) if h == handle => {
                self.rows.remove(display_index);
            }
            _ => self.rows.retain(|&(h, _)| h != handle),
        }
        self.recycled += 1;
    }

    fn on_handle_allocated(&mut self, _handle: RowHandle) {
        self.live_handles += 1;
    }

    fn on_handle_released(&mut self, _handle: RowHandle) {
        self.live_handles = self.live_handles.saturating_sub(1);
    }

    fn on_row_reindexed(&mut self, handle: RowHandle, row: usize) {
        if let Some(entry) = self.rows.iter_mut().find(|(h, _)| *h == handle) {
            entry.1 = row;
        }
    }
}
