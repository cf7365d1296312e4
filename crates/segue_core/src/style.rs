//! Captured visual style subsets
//!
//! A shared-element snapshot carries a small subset of visual style next to
//! its measured rect so transitions can crossfade opacity, corner radius,
//! and background color between the two ends of a match.

use serde::{Deserialize, Serialize};

/// Subset of visual style captured per `(tag, screen)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Corner radius in pixels
    pub corner_radius: Option<f32>,
    /// Background color as RGBA components (0.0 to 1.0)
    pub background: Option<[f32; 4]>,
}

impl StyleSnapshot {
    /// Snapshot with only opacity set
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Interpolate between two snapshots. A property present on only one
    /// side is held rather than invented on the other.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            corner_radius: lerp_opt(self.corner_radius, other.corner_radius, t),
            background: lerp_opt_rgba(self.background, other.background, t),
        }
    }

    /// Opacity with the unset default applied
    pub fn resolved_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    /// Corner radius with the unset default applied
    pub fn resolved_corner_radius(&self) -> f32 {
        self.corner_radius.unwrap_or(0.0)
    }
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn lerp_opt_rgba(a: Option<[f32; 4]>, b: Option<[f32; 4]>, t: f32) -> Option<[f32; 4]> {
    match (a, b) {
        (Some(a), Some(b)) => Some([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ]),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
