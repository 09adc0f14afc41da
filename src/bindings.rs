//! JavaScript facade over `GridViewport` (wasm32 only).
//!
//! The host passes plain functions: one measuring a cell, optional ones
//! measuring headers and receiving row materialize/recycle events.

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::config::GridConfig;
use crate::render::RowPresenter;
use crate::source::GridSource;
use crate::types::{GridCellRange, GridCellRef, Point, SelectionMode, Size};
use crate::viewer::{GridViewport, RowHandle};

fn js_index(index: usize) -> JsValue {
    JsValue::from_f64(index as f64)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

struct JsSource {
    rows: usize,
    columns: usize,
    measure: Function,
    measure_header: Option<Function>,
}

impl JsSource {
    fn call_measure(f: &Function, a: &JsValue, b: &JsValue, available: Size) -> Size {
        let Ok(available) = serde_wasm_bindgen::to_value(&available) else {
            return Size::ZERO;
        };
        match f.call3(&JsValue::NULL, a, b, &available) {
            Ok(v) => serde_wasm_bindgen::from_value::<Size>(v).unwrap_or(Size::ZERO),
            Err(err) => {
                warn!(target: "gridport::bindings", error = ?err, "measure callback threw");
                Size::ZERO
            }
        }
    }
}

impl GridSource for JsSource {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn measure_cell(&self, row: usize, col: usize, available: Size) -> Size {
        Self::call_measure(&self.measure, &js_index(row), &js_index(col), available)
    }

    fn measure_header(&self, col: usize, available: Size) -> Size {
        match &self.measure_header {
            Some(f) => Self::call_measure(f, &js_index(col), &JsValue::UNDEFINED, available),
            None => Size::ZERO,
        }
    }
}

#[derive(Default)]
struct JsPresenter {
    materialized: Option<Function>,
    recycled: Option<Function>,
}

impl RowPresenter for JsPresenter {
    fn on_row_materialized(&mut self, display_index: usize, handle: RowHandle, row: usize) {
        if let Some(f) = &self.materialized {
            if let Err(err) = f.call3(
                &JsValue::NULL,
                &js_index(display_index),
                &js_index(handle.index()),
                &js_index(row),
            ) {
                warn!(
                    target: "gridport::bindings",
                    display_index,
                    row,
                    error = ?err,
                    "materialize callback threw"
                );
            }
        }
    }

    fn on_row_recycled(&mut self, display_index: usize, handle: RowHandle) {
        if let Some(f) = &self.recycled {
            if let Err(err) = f.call2(&JsValue::NULL, &js_index(display_index), &js_index(handle.index())) {
                warn!(
                    target: "gridport::bindings",
                    display_index,
                    error = ?err,
                    "recycle callback threw"
                );
            }
        }
    }
}

/// Grid viewport driven from JavaScript.
#[wasm_bindgen(js_name = "GridViewport")]
pub struct JsGridViewport {
    grid: GridViewport,
    source: JsSource,
    presenter: JsPresenter,
}

#[wasm_bindgen(js_class = "GridViewport")]
impl JsGridViewport {
    /// `config` may be `undefined` for defaults. `measure(row, col, available)`
    /// must return `{ width, height }`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        row_count: usize,
        column_count: usize,
        measure: Function,
    ) -> Result<JsGridViewport, JsValue> {
        console_error_panic_hook::set_once();
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };
        let grid = GridViewport::new(config)?;
        Ok(Self {
            grid,
            source: JsSource {
                rows: row_count,
                columns: column_count,
                measure,
                measure_header: None,
            },
            presenter: JsPresenter::default(),
        })
    }

    /// Receive `(displayIndex, handle, row)` and `(displayIndex, handle)`.
    #[wasm_bindgen(js_name = "setPresenter")]
    pub fn set_presenter(&mut self, materialized: Function, recycled: Function) {
        self.presenter = JsPresenter {
            materialized: Some(materialized),
            recycled: Some(recycled),
        };
    }

    #[wasm_bindgen(js_name = "setHeaderMeasure")]
    pub fn set_header_measure(&mut self, measure: Function) {
        self.source.measure_header = Some(measure);
    }

    #[wasm_bindgen(js_name = "setCounts")]
    pub fn set_counts(&mut self, row_count: usize, column_count: usize) {
        self.source.rows = row_count;
        self.source.columns = column_count;
        self.layout();
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.grid.resize(width, height)?;
        self.layout();
        Ok(())
    }

    pub fn layout(&mut self) {
        self.grid.layout(&self.source, &mut self.presenter);
    }

    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.grid.scroll_by(dx, dy, &self.source, &mut self.presenter);
    }

    #[wasm_bindgen(js_name = "setScroll")]
    pub fn set_scroll(&mut self, horizontal: f32, vertical: f32) {
        self.grid
            .set_scroll(horizontal, vertical, &self.source, &mut self.presenter);
    }

    #[wasm_bindgen(js_name = "scrollRowIntoView")]
    pub fn scroll_row_into_view(&mut self, row: usize) -> Result<(), JsValue> {
        self.grid
            .scroll_row_into_view(row, &self.source, &mut self.presenter)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "scrollColumnIntoView")]
    pub fn scroll_column_into_view(&mut self, col: usize) -> Result<(), JsValue> {
        self.grid
            .scroll_column_into_view(col, &self.source, &mut self.presenter)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "currentWindow")]
    pub fn current_window(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.current_window())
    }

    #[wasm_bindgen(js_name = "scrollOffset")]
    pub fn scroll_offset(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.scroll_offset())
    }

    /// `null` when the cell is not displayed.
    #[wasm_bindgen(js_name = "cellRect")]
    pub fn cell_rect(&self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        to_js(&self.grid.cell_rect(GridCellRef::new(row, col)))
    }

    #[wasm_bindgen(js_name = "hitTest")]
    pub fn hit_test(&self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        to_js(&self.grid.hit_test(Point::new(x, y)))
    }

    /// `mode` is `"block"`, `"rows"` or `"columns"`.
    #[wasm_bindgen(js_name = "selectionRect")]
    pub fn selection_rect(
        &self,
        row0: usize,
        col0: usize,
        row1: usize,
        col1: usize,
        mode: JsValue,
    ) -> Result<JsValue, JsValue> {
        let mode: SelectionMode = if mode.is_undefined() {
            SelectionMode::default()
        } else {
            serde_wasm_bindgen::from_value(mode)
                .map_err(|e| JsValue::from_str(&format!("Invalid selection mode: {e}")))?
        };
        let range = GridCellRange::new(GridCellRef::new(row0, col0), GridCellRef::new(row1, col1));
        to_js(&self.grid.selection_rect(&range, mode))
    }

    #[wasm_bindgen(js_name = "insertRows")]
    pub fn insert_rows(&mut self, at: usize, count: usize) -> Result<(), JsValue> {
        self.grid.insert_rows(at, count, &mut self.presenter)?;
        self.source.rows += count;
        self.layout();
        Ok(())
    }

    #[wasm_bindgen(js_name = "removeRows")]
    pub fn remove_rows(&mut self, at: usize, count: usize) -> Result<(), JsValue> {
        self.grid.remove_rows(at, count, &mut self.presenter)?;
        self.source.rows = self.source.rows.saturating_sub(count);
        self.layout();
        Ok(())
    }

    #[wasm_bindgen(js_name = "moveColumn")]
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), JsValue> {
        self.grid.move_column(from, to)?;
        self.layout();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setFrozenColumns")]
    pub fn set_frozen_columns(&mut self, count: usize) -> Result<(), JsValue> {
        self.grid.set_frozen_column_count(count)?;
        self.layout();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setRowHeight")]
    pub fn set_row_height(&mut self, row: usize, height: Option<f32>) -> Result<(), JsValue> {
        self.grid.set_row_height(row, height)?;
        self.layout();
        Ok(())
    }

    #[wasm_bindgen(js_name = "invalidateMeasurements")]
    pub fn invalidate_measurements(&mut self) {
        self.grid.invalidate_measurements();
        self.layout();
    }

    #[wasm_bindgen(js_name = "resetVisuals")]
    pub fn reset_visuals(&mut self) {
        self.grid.reset_visuals(&mut self.presenter);
        self.layout();
    }
}
