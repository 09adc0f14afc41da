//! Headless scenes: a JSON description of a grid, its data sizes and a list
//! of operations, replayed against a `GridViewport`.
//!
//! Used by the CLI and benchmarks to drive the engine without a renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{ColumnDef, ScrollOffset};
use crate::render::{RenderTree, SelectionRect};
use crate::source::GridSource;
use crate::types::{GridCellRange, GridCellRef, Point, Rect, SelectionMode, Size};
use crate::viewer::{GridViewport, ViewportWindow};

/// Grid definition plus the operations to replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub config: GridConfig,
    /// Explicit column definitions; the source may report more
    pub columns: Vec<ColumnDef>,
    pub row_count: usize,
    /// Defaults to `columns.len()`
    pub column_count: Option<usize>,
    /// Natural size of any cell without an override
    pub cell_size: Size,
    /// Natural height per row identity
    pub row_heights: BTreeMap<usize, f32>,
    /// Natural width per column identity
    pub column_widths: BTreeMap<usize, f32>,
    /// Natural header width per column identity
    pub header_widths: BTreeMap<usize, f32>,
    pub viewport: Size,
    pub ops: Vec<SceneOp>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            columns: Vec::new(),
            row_count: 0,
            column_count: None,
            cell_size: Size::new(60.0, 20.0),
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            header_widths: BTreeMap::new(),
            viewport: Size::new(800.0, 600.0),
            ops: Vec::new(),
        }
    }
}

/// One replayed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SceneOp {
    ScrollBy { dx: f32, dy: f32 },
    SetScroll { horizontal: f32, vertical: f32 },
    Resize { width: f32, height: f32 },
    ScrollRowIntoView { row: usize },
    ScrollColumnIntoView { col: usize },
    InsertRows { at: usize, count: usize },
    RemoveRows { at: usize, count: usize },
    MoveColumn { from: usize, to: usize },
    SetFrozenColumns { count: usize },
    SetRowHeight { row: usize, height: Option<f32> },
    InvalidateMeasurements,
    ResetVisuals,
    CellRect { row: usize, col: usize },
    HitTest { x: f32, y: f32 },
    SelectionRect {
        from: GridCellRef,
        to: GridCellRef,
        #[serde(default)]
        mode: SelectionMode,
    },
}

/// State after one operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub op: SceneOp,
    pub window: ViewportWindow,
    pub offset: ScrollOffset,
    /// Total materialize/recycle calls so far
    pub materialized: usize,
    pub recycled: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit: Option<GridCellRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionRect>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneReport {
    pub initial: ViewportWindow,
    pub steps: Vec<StepReport>,
}

/// Data source backed by a scene's size tables.
#[derive(Debug, Clone)]
pub struct SceneSource {
    pub rows: usize,
    pub columns: usize,
    pub cell_size: Size,
    pub row_heights: BTreeMap<usize, f32>,
    pub column_widths: BTreeMap<usize, f32>,
    pub header_widths: BTreeMap<usize, f32>,
}

impl GridSource for SceneSource {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn measure_cell(&self, row: usize, col: usize, _available: Size) -> Size {
        Size::new(
            self.column_widths.get(&col).copied().unwrap_or(self.cell_size.width),
            self.row_heights.get(&row).copied().unwrap_or(self.cell_size.height),
        )
    }

    fn measure_header(&self, col: usize, _available: Size) -> Size {
        self.header_widths
            .get(&col)
            .map_or(Size::ZERO, |&w| Size::new(w, 0.0))
    }
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.config.validate()?;
        Ok(scene)
    }

    pub fn source(&self) -> SceneSource {
        SceneSource {
            rows: self.row_count,
            columns: self.column_count.unwrap_or(self.columns.len()),
            cell_size: self.cell_size,
            row_heights: self.row_heights.clone(),
            column_widths: self.column_widths.clone(),
            header_widths: self.header_widths.clone(),
        }
    }

    /// Build the engine and lay it out once.
    pub fn build(&self, source: &SceneSource, tree: &mut RenderTree) -> Result<GridViewport> {
        let mut grid = GridViewport::with_columns(self.config.clone(), &self.columns)?;
        grid.resize(self.viewport.width, self.viewport.height)?;
        grid.layout(source, tree);
        Ok(grid)
    }

    /// Replay every operation and report the window after each.
    pub fn run(&self) -> Result<SceneReport> {
        let mut source = self.source();
        let mut tree = RenderTree::new();
        let mut grid = self.build(&source, &mut tree)?;
        let initial = grid.current_window();
        let mut steps = Vec::with_capacity(self.ops.len());

        for op in &self.ops {
            let mut rect = None;
            let mut hit = None;
            let mut selection = None;
            match *op {
                SceneOp::ScrollBy { dx, dy } => grid.scroll_by(dx, dy, &source, &mut tree),
                SceneOp::SetScroll {
                    horizontal,
                    vertical,
                } => grid.set_scroll(horizontal, vertical, &source, &mut tree),
                SceneOp::Resize { width, height } => {
                    grid.resize(width, height)?;
                    grid.layout(&source, &mut tree);
                }
                SceneOp::ScrollRowIntoView { row } => {
                    grid.scroll_row_into_view(row, &source, &mut tree)?;
                }
                SceneOp::ScrollColumnIntoView { col } => {
                    grid.scroll_column_into_view(col, &source, &mut tree)?;
                }
                SceneOp::InsertRows { at, count } => {
                    grid.insert_rows(at, count, &mut tree)?;
                    source.rows += count;
                    grid.layout(&source, &mut tree);
                }
                SceneOp::RemoveRows { at, count } => {
                    grid.remove_rows(at, count, &mut tree)?;
                    source.rows = source.rows.saturating_sub(count);
                    grid.layout(&source, &mut tree);
                }
                SceneOp::MoveColumn { from, to } => {
                    grid.move_column(from, to)?;
                    grid.layout(&source, &mut tree);
                }
                SceneOp::SetFrozenColumns { count } => {
                    grid.set_frozen_column_count(count)?;
                    grid.layout(&source, &mut tree);
                }
                SceneOp::SetRowHeight { row, height } => {
                    grid.set_row_height(row, height)?;
                    grid.layout(&source, &mut tree);
                }
                SceneOp::InvalidateMeasurements => {
                    grid.invalidate_measurements();
                    grid.layout(&source, &mut tree);
                }
                SceneOp::ResetVisuals => {
                    grid.reset_visuals(&mut tree);
                    grid.layout(&source, &mut tree);
                }
                SceneOp::CellRect { row, col } => rect = grid.cell_rect(GridCellRef::new(row, col)),
                SceneOp::HitTest { x, y } => hit = grid.hit_test(Point::new(x, y)),
                SceneOp::SelectionRect { from, to, mode } => {
                    selection = grid.selection_rect(&GridCellRange::new(from, to), mode);
                }
            }
            let (materialized, recycled) = tree.event_counts();
            steps.push(StepReport {
                op: op.clone(),
                window: grid.current_window(),
                offset: grid.scroll_offset(),
                materialized,
                recycled,
                rect,
                hit,
                selection,
            });
        }

        info!(
            target: "gridport::scene",
            ops = steps.len(),
            rows = source.rows,
            live_visuals = tree.live_handles(),
            "scene replayed"
        );
        Ok(SceneReport { initial, steps })
    }
}
