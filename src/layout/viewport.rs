//! Viewport size and scroll offset state.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Absolute scroll position in pixels.
///
/// `horizontal` is measured inside the scrolling (non-frozen) column region;
/// `vertical` from the top of row 0. Both include the leading partial
/// extent of the first displayed track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Viewport state - the visible cell area and where it sits in the content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport width in pixels (may be infinite)
    pub width: f32,
    /// Viewport height in pixels (may be infinite)
    pub height: f32,
    pub offset: ScrollOffset,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            offset: ScrollOffset::default(),
        }
    }

    /// Resize the viewport. NaN and negative extents are caller bugs.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        if width.is_nan() || height.is_nan() || width < 0.0 || height < 0.0 {
            return Err(GridError::InvalidSize(format!(
                "viewport {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Width left for scrolling columns once the frozen prefix is drawn.
    pub fn scrolling_width(&self, frozen_width: f32) -> f32 {
        (self.width - frozen_width).max(0.0)
    }

    /// Largest vertical offset that still fills the viewport.
    pub fn max_vertical(&self, total_height: f32) -> f32 {
        if !self.height.is_finite() {
            return 0.0;
        }
        (total_height - self.height).max(0.0)
    }

    /// Largest horizontal offset inside the scrolling region.
    pub fn max_horizontal(&self, scrolling_content: f32, frozen_width: f32) -> f32 {
        if !self.width.is_finite() {
            return 0.0;
        }
        (scrolling_content - self.scrolling_width(frozen_width)).max(0.0)
    }

    /// Clamp both offsets into `[0, max]`.
    pub fn clamp_scroll(&mut self, total_height: f32, scrolling_content: f32, frozen_width: f32) {
        let max_x = self.max_horizontal(scrolling_content, frozen_width);
        let max_y = self.max_vertical(total_height);
        self.offset.horizontal = self.offset.horizontal.clamp(0.0, max_x);
        self.offset.vertical = self.offset.vertical.clamp(0.0, max_y);
    }

    /// True when the vertical offset sits on its maximum.
    pub fn at_bottom(&self, total_height: f32) -> bool {
        let max = self.max_vertical(total_height);
        max > 0.0 && self.offset.vertical >= max - SNAP_EPSILON
    }
}

/// Offsets within this distance of an edge snap to it.
pub const SNAP_EPSILON: f32 = 0.001;
