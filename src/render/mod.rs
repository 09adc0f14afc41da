//! Presentation-side interfaces.
//!
//! This module provides:
//! - The render-tree hooks the row window drives (`RowPresenter`)
//! - Pure cell geometry and hit testing over the current window
//! - Selection overlay rectangles with frozen-edge handling

pub mod geometry;
pub mod presenter;
pub mod selection;

pub use geometry::GeometryMapper;
pub use presenter::{RenderTree, RowPresenter};
pub use selection::SelectionRect;
