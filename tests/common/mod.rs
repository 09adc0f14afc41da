//! Common test utilities: sources, a recording presenter and grid builders.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::Cell;
use std::collections::HashMap;

use gridport::layout::{ColumnDef, RowSizing};
use gridport::{GridConfig, GridSource, GridViewport, RowHandle, RowPresenter, Size};

// ============================================================================
// Sources
// ============================================================================

/// Every cell has the same natural size. Counts measurement calls.
pub struct UniformSource {
    pub rows: usize,
    pub cols: usize,
    pub cell: Size,
    pub header: Option<f32>,
    pub calls: Cell<usize>,
}

impl UniformSource {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cell: Size::new(50.0, 20.0),
            header: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_cell(mut self, width: f32, height: f32) -> Self {
        self.cell = Size::new(width, height);
        self
    }
}

impl GridSource for UniformSource {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn measure_cell(&self, _row: usize, _col: usize, _available: Size) -> Size {
        self.calls.set(self.calls.get() + 1);
        self.cell
    }

    fn measure_header(&self, _col: usize, _available: Size) -> Size {
        self.header.map_or(Size::ZERO, |w| Size::new(w, 0.0))
    }
}

/// Per-row heights and per-column widths; anything unset uses the default.
pub struct ScriptedSource {
    pub rows: usize,
    pub cols: usize,
    pub heights: HashMap<usize, f32>,
    pub widths: HashMap<usize, f32>,
    pub default: Size,
    pub measured_rows: std::cell::RefCell<Vec<usize>>,
}

impl ScriptedSource {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            heights: HashMap::new(),
            widths: HashMap::new(),
            default: Size::new(50.0, 20.0),
            measured_rows: std::cell::RefCell::new(Vec::new()),
        }
    }
}

impl GridSource for ScriptedSource {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn measure_cell(&self, row: usize, col: usize, _available: Size) -> Size {
        let mut seen = self.measured_rows.borrow_mut();
        if seen.last() != Some(&row) {
            seen.push(row);
        }
        Size::new(
            self.widths.get(&col).copied().unwrap_or(self.default.width),
            self.heights.get(&row).copied().unwrap_or(self.default.height),
        )
    }
}

// ============================================================================
// Presenter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Materialized { index: usize, handle: RowHandle, row: usize },
    Recycled { index: usize, handle: RowHandle },
}

/// Records every hook call and mirrors the render tree, panicking as soon
/// as the two disagree.
#[derive(Default)]
pub struct RecordingPresenter {
    pub events: Vec<Event>,
    pub tree: Vec<(RowHandle, usize)>,
    pub allocated: usize,
    pub released: usize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn counts(events: &[Event]) -> (usize, usize) {
        events.iter().fold((0, 0), |(m, r), e| match e {
            Event::Materialized { .. } => (m + 1, r),
            Event::Recycled { .. } => (m, r + 1),
        })
    }

    pub fn rows(&self) -> Vec<usize> {
        self.tree.iter().map(|&(_, row)| row).collect()
    }
}

impl RowPresenter for RecordingPresenter {
    fn on_row_materialized(&mut self, display_index: usize, handle: RowHandle, row: usize) {
        assert!(display_index <= self.tree.len(), "materialize past the end");
        assert!(
            self.tree.iter().all(|&(h, _)| h != handle),
            "handle {handle:?} is already displayed"
        );
        self.tree.insert(display_index, (handle, row));
        self.events.push(Event::Materialized {
            index: display_index,
            handle,
            row,
        });
    }

    fn on_row_recycled(&mut self, display_index: usize, handle: RowHandle) {
        let (h, _) = self.tree.remove(display_index);
        assert_eq!(h, handle, "recycled handle does not match render tree");
        self.events.push(Event::Recycled {
            index: display_index,
            handle,
        });
    }

    fn on_handle_allocated(&mut self, _handle: RowHandle) {
        self.allocated += 1;
    }

    fn on_handle_released(&mut self, _handle: RowHandle) {
        self.released += 1;
    }

    fn on_row_reindexed(&mut self, handle: RowHandle, row: usize) {
        let entry = self.tree.iter_mut().find(|(h, _)| *h == handle).unwrap();
        entry.1 = row;
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn fixed_config(row_height: f32) -> GridConfig {
    GridConfig {
        row_sizing: RowSizing::Fixed(row_height),
        ..GridConfig::default()
    }
}

/// Grid of fixed-height rows and fixed-width columns, laid out once.
pub fn fixed_grid(
    row_height: f32,
    col_widths: &[f32],
    viewport: (f32, f32),
    source: &dyn GridSource,
    presenter: &mut dyn RowPresenter,
) -> GridViewport {
    let defs: Vec<ColumnDef> = col_widths.iter().map(|&w| ColumnDef::fixed(w)).collect();
    let mut grid = GridViewport::with_columns(fixed_config(row_height), &defs).unwrap();
    grid.resize(viewport.0, viewport.1).unwrap();
    grid.layout(source, presenter);
    grid
}

/// Assert the grid's row window and the presenter's tree agree.
pub fn assert_in_lockstep(grid: &GridViewport, presenter: &RecordingPresenter) {
    let displayed: Vec<(RowHandle, usize)> = grid.displayed_rows().map(|(row, h)| (h, row)).collect();
    assert_eq!(displayed, presenter.tree);
}
