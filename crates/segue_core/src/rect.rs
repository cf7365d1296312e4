//! Measured layout rectangles and screen-level layout inputs

use serde::{Deserialize, Serialize};

/// Guard a denominator against zero so ratio math never produces
/// `NaN`/`Infinity` for degenerate (zero-sized) rects.
#[inline]
pub fn nonzero_denom(v: f32) -> f32 {
    if v == 0.0 {
        1e-6
    } else {
        v
    }
}

/// An absolute, window-space snapshot of an element's layout at one instant.
///
/// `x`/`y` are relative to the parent; `page_x`/`page_y` are window
/// coordinates. A rect is immutable once captured - a re-measure replaces
/// the whole value rather than mutating fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasuredRect {
    pub x: f32,
    pub y: f32,
    pub page_x: f32,
    pub page_y: f32,
    pub width: f32,
    pub height: f32,
}

impl MeasuredRect {
    pub fn new(x: f32, y: f32, page_x: f32, page_y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            page_x,
            page_y,
            width,
            height,
        }
    }

    /// Build a rect from a window-space origin and size (parent-relative
    /// coordinates equal to the page coordinates).
    pub fn from_origin_size(page_x: f32, page_y: f32, width: f32, height: f32) -> Self {
        Self::new(page_x, page_y, page_x, page_y, width, height)
    }

    /// Center point in window coordinates
    pub fn page_center(&self) -> (f32, f32) {
        (
            self.page_x + self.width * 0.5,
            self.page_y + self.height * 0.5,
        )
    }

    /// Width/height ratio, epsilon-guarded for zero-height rects
    pub fn aspect_ratio(&self) -> f32 {
        self.width / nonzero_denom(self.height)
    }

    /// A rect with no usable area (zero or negative dimension)
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Dimensions of the screen a transition runs on
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub width: f32,
    pub height: f32,
}

impl ScreenLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen center in window coordinates
    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

/// Safe-area insets supplied by the host platform
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}
