//! Value types shared by the layout, viewer and render modules.

mod cell;
mod geometry;
mod selection;

pub use cell::*;
pub use geometry::*;
pub use selection::*;
