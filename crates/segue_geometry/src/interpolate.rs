//! Progress interpolation
//!
//! A screen's own progress runs `[0, 1]`; the combined progress a style
//! callback sees extends to `[1, 2]` while the screen above it animates.
//! Composers therefore interpolate over a caller-selected range: entering
//! transitions over `[0, 1]`, exiting ones over `[1, 2]`.

use serde::{Deserialize, Serialize};

/// Which half of the combined `[0, 2]` progress a composer reads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressRange {
    /// Incoming screen becoming focused: progress `[0, 1]`
    #[default]
    Enter,
    /// Focused screen being covered or dismissed: progress `[1, 2]`
    Exit,
}

impl ProgressRange {
    pub fn bounds(self) -> [f32; 2] {
        match self {
            ProgressRange::Enter => [0.0, 1.0],
            ProgressRange::Exit => [1.0, 2.0],
        }
    }

    /// Range matching a transition direction
    pub fn for_entering(entering: bool) -> Self {
        if entering {
            ProgressRange::Enter
        } else {
            ProgressRange::Exit
        }
    }
}

/// Clamped linear map of `value` from `input` to `output`.
///
/// Values outside the input range clamp to the nearest edge; a collapsed
/// input range returns the first output bound rather than dividing by zero.
pub fn interpolate(value: f32, input: [f32; 2], output: [f32; 2]) -> f32 {
    let [in_a, in_b] = input;
    let [out_a, out_b] = output;

    let span = in_b - in_a;
    if span.abs() < f32::EPSILON {
        return out_a;
    }

    let t = ((value - in_a) / span).clamp(0.0, 1.0);
    out_a + (out_b - out_a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        assert_eq!(interpolate(0.5, [0.0, 1.0], [0.0, 10.0]), 5.0);
    }

    #[test]
    fn test_clamps_outside_input() {
        assert_eq!(interpolate(-1.0, [0.0, 1.0], [0.0, 10.0]), 0.0);
        assert_eq!(interpolate(3.0, [0.0, 1.0], [0.0, 10.0]), 10.0);
    }

    #[test]
    fn test_reversed_output() {
        assert_eq!(interpolate(1.25, [1.0, 2.0], [1.0, 0.0]), 0.75);
    }

    #[test]
    fn test_collapsed_input_range() {
        assert_eq!(interpolate(0.5, [1.0, 1.0], [3.0, 9.0]), 3.0);
    }
}
