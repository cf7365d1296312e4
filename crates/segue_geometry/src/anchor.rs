//! Anchor points within a rectangle

use segue_core::MeasuredRect;
use serde::{Deserialize, Serialize};

/// A named pivot point within a rectangle.
///
/// The anchor is the point the two ends of a shared-element match snap
/// together on - geometry keeps it (not the bounding-box center) fixed
/// while the rest of the rect scales around it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Absolute window-space position of this anchor within `rect`
    pub fn point_in(&self, rect: &MeasuredRect) -> (f32, f32) {
        let (fx, fy) = self.fractions();
        (
            rect.page_x + rect.width * fx,
            rect.page_y + rect.height * fy,
        )
    }

    /// Horizontal/vertical position as fractions of the rect size
    fn fractions(&self) -> (f32, f32) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::Top => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::Left => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::Right => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::Bottom => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }
}
