//! Scale-mode policies
//!
//! A scale mode decides how the independent axis ratios between two rects
//! combine into the scale factors applied to an element.

use segue_core::{nonzero_denom, MeasuredRect};
use serde::{Deserialize, Serialize};

/// Aspect-ratio difference below which the uniform policy covers
/// (`max`) instead of fits (`min`).
const ASPECT_TOLERANCE: f32 = 0.1;

/// Policy for combining axis scale ratios
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Translate-only: scale stays (1, 1)
    None,
    /// Independent axis ratios: `start.w / end.w`, `start.h / end.h`
    #[default]
    Match,
    /// One scalar for both axes. Near-equal aspect ratios use
    /// `max(sx, sy)` (covers, avoids letterboxing); dissimilar ones use
    /// `min(sx, sy)` (fits, avoids overflow).
    Uniform,
}

impl ScaleMode {
    /// Per-axis scale factors taking `end` to `start`
    pub fn factors(&self, start: &MeasuredRect, end: &MeasuredRect) -> (f32, f32) {
        match self {
            ScaleMode::None => (1.0, 1.0),
            ScaleMode::Match => axis_ratios(start, end),
            ScaleMode::Uniform => {
                let s = uniform_factor(start, end);
                (s, s)
            }
        }
    }

    /// Single scalar for whole-screen content transforms.
    ///
    /// A content transform cannot apply independent axis factors without
    /// distorting the screen, so `Match` collapses to the same
    /// aspect-based policy as `Uniform` here.
    pub fn scalar_factor(&self, start: &MeasuredRect, end: &MeasuredRect) -> f32 {
        match self {
            ScaleMode::None => 1.0,
            ScaleMode::Match | ScaleMode::Uniform => uniform_factor(start, end),
        }
    }
}

fn axis_ratios(start: &MeasuredRect, end: &MeasuredRect) -> (f32, f32) {
    (
        start.width / nonzero_denom(end.width),
        start.height / nonzero_denom(end.height),
    )
}

fn uniform_factor(start: &MeasuredRect, end: &MeasuredRect) -> f32 {
    let (sx, sy) = axis_ratios(start, end);
    let aspect_delta = (start.aspect_ratio() - end.aspect_ratio()).abs();
    if aspect_delta < ASPECT_TOLERANCE {
        sx.max(sy)
    } else {
        sx.min(sy)
    }
}
