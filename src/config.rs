//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{ColumnDef, RowSizing, DEFAULT_ROW_HEIGHT};

/// Settings a host supplies when creating a [`GridViewport`](crate::GridViewport).
///
/// Deserializes from camelCase JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Global row height policy
    pub row_sizing: RowSizing,
    /// Height assumed for auto rows that were never realized
    pub estimated_row_height: f32,
    /// Definition used for columns the source reports beyond the defined ones
    pub default_column: ColumnDef,
    /// Length of the frozen display prefix
    pub frozen_column_count: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_sizing: RowSizing::default(),
            estimated_row_height: DEFAULT_ROW_HEIGHT,
            default_column: ColumnDef::default(),
            frozen_column_count: 0,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.row_sizing.validate()?;
        self.default_column.validate()?;
        if !self.estimated_row_height.is_finite() || self.estimated_row_height <= 0.0 {
            return Err(crate::error::GridError::InvalidSize(format!(
                "estimated row height {}",
                self.estimated_row_height
            )));
        }
        Ok(())
    }
}
