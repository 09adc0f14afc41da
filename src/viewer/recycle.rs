//! Slot arena for row visuals plus the recycle pool.
//!
//! Every handle is in exactly one place: bound to a row in the window, or
//! parked on the pool stack. The arena only grows; slots go away when the
//! whole arena is cleared.

use serde::Serialize;
use tracing::trace;

use crate::render::RowPresenter;

/// Opaque handle to one materialized row visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowHandle(usize);

impl RowHandle {
    /// Slot index inside the arena; stable for the handle's lifetime.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RowArena {
    /// slot -> bound row identity, `None` while pooled
    slots: Vec<Option<usize>>,
    pool: Vec<RowHandle>,
}

impl RowArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a handle for `row`, reusing the most recently recycled slot.
    pub fn acquire(&mut self, row: usize, presenter: &mut dyn RowPresenter) -> RowHandle {
        let handle = match self.pool.pop() {
            Some(handle) => handle,
            None => {
                let handle = RowHandle(self.slots.len());
                self.slots.push(None);
                presenter.on_handle_allocated(handle);
                trace!(target: "gridport::recycle", slot = handle.0, "allocated row visual");
                handle
            }
        };
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = Some(row);
        }
        handle
    }

    /// Return a bound handle to the pool. Pooled handles are ignored.
    pub fn release(&mut self, handle: RowHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.take().is_some() {
                self.pool.push(handle);
            }
        }
    }

    /// Point a bound handle at a new row identity after rows shifted.
    pub fn rebind(&mut self, handle: RowHandle, row: usize) {
        if let Some(Some(bound)) = self.slots.get_mut(handle.0) {
            *bound = row;
        }
    }

    pub fn bound_row(&self, handle: RowHandle) -> Option<usize> {
        self.slots.get(handle.0).copied().flatten()
    }

    /// Drop every slot. Bound handles must already be released.
    pub fn clear(&mut self, presenter: &mut dyn RowPresenter) {
        for index in 0..self.slots.len() {
            presenter.on_handle_released(RowHandle(index));
        }
        self.slots.clear();
        self.pool.clear();
    }

    /// Handles waiting on the pool.
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Handles ever allocated since the last clear.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn recycled_handles_are_reused_lifo() {
        let mut arena = RowArena::new();
        let a = arena.acquire(0, &mut ());
        let b = arena.acquire(1, &mut ());
        arena.release(a);
        arena.release(b);
        assert_eq!(arena.pooled(), 2);

        let c = arena.acquire(7, &mut ());
        assert_eq!(c, b);
        assert_eq!(arena.bound_row(c), Some(7));
        assert_eq!(arena.allocated(), 2);
    }

    #[test]
    fn double_release_does_not_duplicate_pool_entry() {
        let mut arena = RowArena::new();
        let a = arena.acquire(0, &mut ());
        arena.release(a);
        arena.release(a);
        assert_eq!(arena.pooled(), 1);
        assert_eq!(arena.bound_row(a), None);
    }

    #[test]
    fn clear_drops_all_slots() {
        let mut arena = RowArena::new();
        let a = arena.acquire(0, &mut ());
        arena.rebind(a, 4);
        assert_eq!(arena.bound_row(a), Some(4));
        arena.release(a);
        arena.clear(&mut ());
        assert_eq!(arena.allocated(), 0);
        assert_eq!(arena.pooled(), 0);
    }
}
