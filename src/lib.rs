//! gridport - virtualized grid viewport engine
//!
//! Computes what a scrolled grid shows and where, without owning any data
//! or drawing anything:
//! - Fixed, auto-measured and proportional (star) column sizing
//! - Fixed, overridden or auto-measured row heights
//! - Frozen leading columns, hidden and reorderable columns
//! - Row virtualization with visual recycling and differential updates
//! - Cell rectangles, hit testing and selection overlays
//!
//! # Usage (Rust)
//!
//! ```ignore
//! use gridport::{GridConfig, GridViewport, RenderTree};
//!
//! let mut grid = GridViewport::new(GridConfig::default())?;
//! grid.resize(800.0, 600.0)?;
//! let mut tree = RenderTree::new();
//! grid.layout(&my_source, &mut tree);
//! grid.scroll_by(0.0, 120.0, &my_source, &mut tree);
//! let window = grid.current_window();
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridViewport } from 'gridport';
//! await init();
//! const grid = new GridViewport(config, rowCount, columnCount, measure);
//! grid.resize(800, 600);
//! grid.scrollBy(0, 120);
//! const window = grid.currentWindow();
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod scene;
pub mod source;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
mod bindings;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use layout::{ColumnDef, RowSizing, ScrollOffset, SizeConstraints, SizeSpec};
pub use render::{RenderTree, RowPresenter, SelectionRect};
pub use source::GridSource;
pub use types::*;
pub use viewer::{GridViewport, IndexSpan, RowHandle, ViewportWindow, WindowChange};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
