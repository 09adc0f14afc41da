//! Structured error types for gridport.
//!
//! Only configuration mistakes surface as errors. Stale windows after a
//! structural edit and degenerate viewport sizes are handled in place.

/// All errors the engine reports back to its host.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Min/max bounds that are NaN, negative, or inverted.
    #[error("invalid size constraint: min={min}, max={max}")]
    InvalidConstraint { min: f32, max: f32 },

    /// A size request that can never resolve to a pixel extent.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Row identity outside `0..row_count`.
    #[error("row {row} out of range (row count {count})")]
    RowOutOfRange { row: usize, count: usize },

    /// Column identity or display position outside `0..column_count`.
    #[error("column {col} out of range (column count {count})")]
    ColumnOutOfRange { col: usize, count: usize },

    /// Structural edit touching indices past the end of the data.
    #[error("range {start}..{end} out of bounds (length {len})")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Config or scene description failed to deserialize.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
