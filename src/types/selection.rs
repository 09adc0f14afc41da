use serde::{Deserialize, Serialize};

/// How a [`GridCellRange`](super::GridCellRange) is interpreted for
/// containment and overlay geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Rectangular block of cells (default)
    #[default]
    Block,
    /// Entire row(s), every column
    Rows,
    /// Entire column(s), every row
    Columns,
}
