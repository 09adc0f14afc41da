//! `GridViewport` - the engine entry point.
//!
//! Owns the column and row models, the viewport and the row window, and
//! runs the layout cycle:
//! - Reconcile row/column counts with the source
//! - Realize and measure the rows in the window
//! - Two-pass column sizing, then the horizontal window
//!
//! Geometry queries read the state left by the last `layout` call, so any
//! size, scroll or data change must be followed by `layout` before asking
//! for rectangles.

mod edits;
mod recycle;
mod scroll;
mod window;

use tracing::debug;

pub use recycle::{RowArena, RowHandle};
pub use window::{
    compute_visible_columns, ColumnWindow, IndexSpan, RowWindow, ViewportWindow, WindowChange,
};

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{ColumnDef, ColumnSet, RowSet, RowSizing, ScrollOffset, Viewport};
use crate::render::{GeometryMapper, RowPresenter, SelectionRect};
use crate::source::GridSource;
use crate::types::{GridCellRange, GridCellRef, Point, Rect, SelectionMode, Size};

/// Virtualized grid viewport.
#[derive(Debug)]
pub struct GridViewport {
    config: GridConfig,
    columns: ColumnSet,
    rows: RowSet,
    viewport: Viewport,
    row_window: RowWindow,
    /// Vertical anchor: first displayed row and how far it is scrolled up
    first_row: usize,
    lead_row: f32,
    /// Horizontal anchor: first scrolling display position and its lead
    first_col: Option<usize>,
    lead_col: f32,
    col_window: ColumnWindow,
    /// Rows measured whole since the last layout pass
    fresh_rows: Vec<usize>,
}

impl GridViewport {
    /// Create an engine with no columns; the source's column count fills
    /// them from `config.default_column` on the first layout.
    pub fn new(config: GridConfig) -> Result<Self> {
        Self::with_columns(config, &[])
    }

    /// Create an engine with explicit column definitions.
    pub fn with_columns(config: GridConfig, columns: &[ColumnDef]) -> Result<Self> {
        config.validate()?;
        let rows = RowSet::new(config.row_sizing, config.estimated_row_height)?;
        let mut columns = ColumnSet::from_defs(columns)?;
        columns.set_frozen_count(config.frozen_column_count.min(columns.len()))?;
        Ok(Self {
            config,
            columns,
            rows,
            viewport: Viewport::new(),
            row_window: RowWindow::new(),
            first_row: 0,
            lead_row: 0.0,
            first_col: None,
            lead_col: 0.0,
            col_window: ColumnWindow::default(),
            fresh_rows: Vec::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.viewport.offset
    }

    pub fn row_window(&self) -> &RowWindow {
        &self.row_window
    }

    /// Window snapshot for the presentation layer.
    pub fn current_window(&self) -> ViewportWindow {
        ViewportWindow {
            rows: self.row_window.span(),
            cols: self.col_window.span,
            leading_row_offset: self.lead_row,
            leading_col_offset: self.col_window.leading_offset,
            frozen_cols: self.columns.frozen_count(),
        }
    }

    /// `(row, handle)` pairs currently displayed, top to bottom.
    pub fn displayed_rows(&self) -> impl Iterator<Item = (usize, RowHandle)> + '_ {
        self.row_window.iter()
    }

    /// Column identities currently displayed, frozen prefix first.
    pub fn displayed_columns(&self) -> Vec<usize> {
        self.geometry()
            .displayed_positions()
            .filter_map(|pos| self.columns.id_at(pos))
            .collect()
    }

    /// Resize the viewport. Call [`layout`](Self::layout) afterwards.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.viewport.resize(width, height)
    }

    /// Full layout cycle. Returns what changed in the row window.
    pub fn layout(
        &mut self,
        source: &dyn GridSource,
        presenter: &mut dyn RowPresenter,
    ) -> WindowChange {
        self.sync_counts(source, presenter);
        self.measure_headers(source);
        let change = self.update_row_window(source, presenter);
        self.measure_pending_columns(source);
        let pass = self
            .columns
            .layout(self.viewport.width, |col, _max| col.natural_width());
        self.update_column_window();
        debug!(
            target: "gridport::viewport",
            width = self.viewport.width,
            height = self.viewport.height,
            rows = self.rows.len(),
            total_height = self.rows.total_height(),
            total_width = pass.total_width,
            vertical = self.viewport.offset.vertical,
            horizontal = self.viewport.offset.horizontal,
            "layout"
        );
        change
    }

    fn measure_headers(&mut self, source: &dyn GridSource) {
        let width = self.viewport.width;
        for id in 0..self.columns.len() {
            if self.columns.needs_header_measure(id, width) {
                let available = Size::new(self.columns.measure_constraint(id, width), f32::INFINITY);
                let natural = source.measure_header(id, available);
                self.columns.set_header_width(id, natural.width);
            }
        }
    }

    /// Pure geometry over the current window.
    pub fn geometry(&self) -> GeometryMapper<'_> {
        GeometryMapper::new(
            &self.columns,
            &self.rows,
            &self.viewport,
            self.row_window.span(),
            self.lead_row,
            self.col_window,
        )
    }

    /// Rectangle of a displayed cell, in viewport coordinates.
    pub fn cell_rect(&self, cell: GridCellRef) -> Option<Rect> {
        self.geometry().cell_rect(cell)
    }

    /// Cell under a viewport point.
    pub fn hit_test(&self, point: Point) -> Option<GridCellRef> {
        self.geometry().hit_test(point)
    }

    /// Overlay rectangle for a selection.
    pub fn selection_rect(&self, range: &GridCellRange, mode: SelectionMode) -> Option<SelectionRect> {
        self.geometry().selection_rect(range, mode)
    }

    /// Whether `cell` falls inside `range` as the columns are displayed.
    pub fn is_selected(&self, range: &GridCellRange, cell: GridCellRef, mode: SelectionMode) -> bool {
        let pos = |id: usize| self.columns.get(id).map(|c| c.display_index());
        let in_rows = (range.top_left().row..=range.bottom_right().row).contains(&cell.row);
        let in_cols = match (
            pos(range.top_left().col),
            pos(range.bottom_right().col),
            pos(cell.col),
        ) {
            (Some(a), Some(b), Some(p)) => (a.min(b)..=a.max(b)).contains(&p),
            _ => false,
        };
        match mode {
            SelectionMode::Block => in_rows && in_cols,
            SelectionMode::Rows => in_rows,
            SelectionMode::Columns => in_cols,
        }
    }

    /// Set or clear a row's explicit height. Rows above the window keep the
    /// displayed content in place by shifting the offset.
    pub fn set_row_height(&mut self, row: usize, height: Option<f32>) -> Result<()> {
        let before = self.rows.height(row);
        self.rows.set_explicit_height(row, height)?;
        if row < self.first_row {
            let delta = self.rows.height(row) - before;
            self.viewport.offset.vertical = (self.viewport.offset.vertical + delta).max(0.0);
        }
        Ok(())
    }

    /// Switch between fixed and auto row heights.
    pub fn set_row_sizing(&mut self, sizing: RowSizing) -> Result<()> {
        self.rows.set_sizing(sizing)?;
        self.config.row_sizing = sizing;
        Ok(())
    }

    /// Forget every measured size; auto rows and columns re-measure on the
    /// next layout.
    pub fn invalidate_measurements(&mut self) {
        self.rows.clear_measurements();
        self.columns.clear_measurements();
    }

    /// Recycle every displayed row and release all visuals.
    pub fn reset_visuals(&mut self, presenter: &mut dyn RowPresenter) {
        self.row_window.reset(presenter);
        debug!(target: "gridport::viewport", "visuals reset");
    }
}
