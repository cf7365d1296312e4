//! Style composers
//!
//! Composers turn a geometry plus the current progress into the values a
//! rendering layer applies to an element. Every composer exists in two
//! explicitly named forms rather than one flag-switched function:
//!
//! - a `*_values` form returning raw numeric fields
//! - a `compose_*` form returning a ready [`ElementStyle`]
//!
//! All composers branch on the geometry's `entering` flag so the same
//! geometry serves the opening animation and its mirror-image close, and
//! all interpolation goes through the clamped [`interpolate`] primitive -
//! an unresolved match simply never reaches a composer, and a composer
//! never panics or produces non-finite output for degenerate rects.

use segue_core::{nonzero_denom, MeasuredRect, StyleSnapshot};

use crate::content::ContentGeometry;
use crate::interpolate::{interpolate, ProgressRange};
use crate::relative::RelativeGeometry;

// ============================================================================
// Value and style types
// ============================================================================

/// Raw translate/scale fields
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformValues {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl TransformValues {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };
}

/// Raw width/height fields
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeValues {
    pub width: f32,
    pub height: f32,
}

impl SizeValues {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };
}

/// Raw absolute-position fields (window space)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectValues {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Style description consumed by the rendering layer.
///
/// Only the fields a composer actually produced are set; `None` means
/// "leave the element's own value alone". The empty style is the neutral
/// result for an unresolved match.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementStyle {
    pub transform: Option<TransformValues>,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub opacity: Option<f32>,
    pub corner_radius: Option<f32>,
}

impl ElementStyle {
    /// Neutral style: applies nothing
    pub fn neutral() -> Self {
        Self::default()
    }
}

// ============================================================================
// Composer inputs
// ============================================================================

/// Optional style-level behavior shared by the composers
#[derive(Clone, Copy, Debug, Default)]
pub struct ComposeOptions {
    /// Crossfade captured styles (opacity/corner radius) between the ends
    pub crossfade: bool,
    pub start_styles: StyleSnapshot,
    pub end_styles: StyleSnapshot,
}

/// Inputs shared by the per-element composers
#[derive(Clone, Copy, Debug)]
pub struct ComposeArgs {
    pub start: MeasuredRect,
    pub end: MeasuredRect,
    pub geometry: RelativeGeometry,
    /// Combined progress (`[0, 2]` across both screens)
    pub progress: f32,
    pub range: ProgressRange,
    pub options: ComposeOptions,
}

/// Inputs for the whole-screen content composer
#[derive(Clone, Copy, Debug)]
pub struct ContentComposeArgs {
    pub geometry: ContentGeometry,
    pub progress: f32,
    pub range: ProgressRange,
    pub options: ComposeOptions,
}

/// Fraction of the displacement still applied at `progress`.
///
/// Entering elements start fully displaced (at the source) and settle to
/// identity; exiting elements start at identity and travel toward the
/// destination. This is the single branch that makes one geometry serve
/// both directions.
fn displacement(progress: f32, range: ProgressRange, entering: bool) -> f32 {
    let output = if entering { [1.0, 0.0] } else { [0.0, 1.0] };
    interpolate(progress, range.bounds(), output)
}

/// Forward fraction of travel from the start rect to the end rect
fn travel(progress: f32, range: ProgressRange, entering: bool) -> f32 {
    let output = if entering { [0.0, 1.0] } else { [1.0, 0.0] };
    interpolate(progress, range.bounds(), output)
}

fn crossfade_styles(style: &mut ElementStyle, args_progress: f32, range: ProgressRange, options: &ComposeOptions, entering: bool) {
    if !options.crossfade {
        return;
    }
    // Style follows the element's travel: fully source-styled at the
    // start rect, fully destination-styled at the end rect.
    let t = 1.0 - displacement(args_progress, range, entering);
    let mixed = options.start_styles.lerp(&options.end_styles, t);
    style.opacity = mixed.opacity;
    style.corner_radius = mixed.corner_radius;
}

// ============================================================================
// Transform composers
// ============================================================================

/// Raw translate/scale for an element animated within its own layout
pub fn relative_transform_values(args: &ComposeArgs) -> TransformValues {
    let g = &args.geometry;
    let f = displacement(args.progress, args.range, g.entering);

    TransformValues {
        translate_x: g.dx * f,
        translate_y: g.dy * f,
        scale_x: 1.0 + (g.scale_x - 1.0) * f,
        scale_y: 1.0 + (g.scale_y - 1.0) * f,
    }
}

/// Styled form of [`relative_transform_values`]
pub fn compose_transform_relative(args: &ComposeArgs) -> ElementStyle {
    let mut style = ElementStyle {
        transform: Some(relative_transform_values(args)),
        ..Default::default()
    };
    crossfade_styles(
        &mut style,
        args.progress,
        args.range,
        &args.options,
        args.geometry.entering,
    );
    style
}

/// Raw translate/scale that positions the element in window space,
/// expressed against its natural (end) rect
pub fn absolute_transform_values(args: &ComposeArgs) -> TransformValues {
    let rect = absolute_size_values(args);

    let (end_cx, end_cy) = args.end.page_center();
    let cx = rect.left + rect.width * 0.5;
    let cy = rect.top + rect.height * 0.5;

    TransformValues {
        translate_x: cx - end_cx,
        translate_y: cy - end_cy,
        scale_x: rect.width / nonzero_denom(args.end.width),
        scale_y: rect.height / nonzero_denom(args.end.height),
    }
}

/// Styled form of [`absolute_transform_values`]: window-space
/// left/top/width/height for an absolutely positioned element
pub fn compose_transform_absolute(args: &ComposeArgs) -> ElementStyle {
    let rect = absolute_size_values(args);
    let mut style = ElementStyle {
        left: Some(rect.left),
        top: Some(rect.top),
        width: Some(rect.width),
        height: Some(rect.height),
        ..Default::default()
    };
    crossfade_styles(
        &mut style,
        args.progress,
        args.range,
        &args.options,
        args.geometry.entering,
    );
    style
}

// ============================================================================
// Size composers
// ============================================================================

/// Raw interpolated dimensions between the two ends
pub fn relative_size_values(args: &ComposeArgs) -> SizeValues {
    let u = travel(args.progress, args.range, args.geometry.entering);
    SizeValues {
        width: interpolate(u, [0.0, 1.0], [args.start.width, args.end.width]),
        height: interpolate(u, [0.0, 1.0], [args.start.height, args.end.height]),
    }
}

/// Styled form of [`relative_size_values`]: width/height only, the
/// element keeps its own position
pub fn compose_size_relative(args: &ComposeArgs) -> ElementStyle {
    let size = relative_size_values(args);
    let mut style = ElementStyle {
        width: Some(size.width),
        height: Some(size.height),
        ..Default::default()
    };
    crossfade_styles(
        &mut style,
        args.progress,
        args.range,
        &args.options,
        args.geometry.entering,
    );
    style
}

/// Raw window-space rect interpolated between the two ends
pub fn absolute_size_values(args: &ComposeArgs) -> RectValues {
    let u = travel(args.progress, args.range, args.geometry.entering);
    RectValues {
        left: interpolate(u, [0.0, 1.0], [args.start.page_x, args.end.page_x]),
        top: interpolate(u, [0.0, 1.0], [args.start.page_y, args.end.page_y]),
        width: interpolate(u, [0.0, 1.0], [args.start.width, args.end.width]),
        height: interpolate(u, [0.0, 1.0], [args.start.height, args.end.height]),
    }
}

/// Styled form of [`absolute_size_values`]: dimensions plus window-space
/// position
pub fn compose_size_absolute(args: &ComposeArgs) -> ElementStyle {
    let rect = absolute_size_values(args);
    let mut style = ElementStyle {
        left: Some(rect.left),
        top: Some(rect.top),
        width: Some(rect.width),
        height: Some(rect.height),
        ..Default::default()
    };
    crossfade_styles(
        &mut style,
        args.progress,
        args.range,
        &args.options,
        args.geometry.entering,
    );
    style
}

// ============================================================================
// Content composer
// ============================================================================

/// Whole-screen style for "zoom into element" presets
pub fn compose_content_style(args: &ContentComposeArgs) -> ElementStyle {
    let g = &args.geometry;
    let f = displacement(args.progress, args.range, g.entering);

    let scale = 1.0 + (g.scale - 1.0) * f;
    let mut style = ElementStyle {
        transform: Some(TransformValues {
            translate_x: g.tx * f,
            translate_y: g.ty * f,
            scale_x: scale,
            scale_y: scale,
        }),
        ..Default::default()
    };
    crossfade_styles(&mut style, args.progress, args.range, &args.options, g.entering);
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::relative::{compute_relative_geometry, GeometryRequest};
    use crate::scale::ScaleMode;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> MeasuredRect {
        MeasuredRect::from_origin_size(x, y, w, h)
    }

    fn args(entering: bool, progress: f32) -> ComposeArgs {
        let start = rect(0.0, 0.0, 100.0, 100.0);
        let end = rect(100.0, 200.0, 200.0, 200.0);
        ComposeArgs {
            start,
            end,
            geometry: compute_relative_geometry(&GeometryRequest {
                start,
                end,
                entering,
                anchor: Anchor::Center,
                scale_mode: ScaleMode::Match,
            }),
            progress,
            range: ProgressRange::for_entering(entering),
            options: ComposeOptions::default(),
        }
    }

    #[test]
    fn test_entering_settles_to_identity() {
        let values = relative_transform_values(&args(true, 1.0));
        assert_eq!(values, TransformValues::IDENTITY);
    }

    #[test]
    fn test_entering_starts_fully_displaced() {
        let a = args(true, 0.0);
        let values = relative_transform_values(&a);
        assert_eq!(values.translate_x, a.geometry.dx);
        assert_eq!(values.scale_x, a.geometry.scale_x);
    }

    #[test]
    fn test_exiting_starts_at_identity() {
        let values = relative_transform_values(&args(false, 1.0));
        assert_eq!(values, TransformValues::IDENTITY);
        // ...and is fully displaced once the covering screen is open.
        let a = args(false, 2.0);
        let values = relative_transform_values(&a);
        assert_eq!(values.translate_x, a.geometry.dx);
    }

    #[test]
    fn test_absolute_travels_start_to_end() {
        let at_start = absolute_size_values(&args(true, 0.0));
        assert_eq!(at_start.left, 0.0);
        assert_eq!(at_start.width, 100.0);

        let at_end = absolute_size_values(&args(true, 1.0));
        assert_eq!(at_end.left, 100.0);
        assert_eq!(at_end.width, 200.0);
    }

    #[test]
    fn test_absolute_transform_matches_rect_midway() {
        let a = args(true, 0.5);
        let rect_values = absolute_size_values(&a);
        let transform = absolute_transform_values(&a);
        assert!((transform.scale_x - rect_values.width / 200.0).abs() < 1e-5);
    }

    #[test]
    fn test_size_relative_interpolates_dimensions() {
        let size = relative_size_values(&args(true, 0.5));
        assert_eq!(size.width, 150.0);
        assert_eq!(size.height, 150.0);
    }

    #[test]
    fn test_crossfade_mixes_styles() {
        let mut a = args(true, 0.5);
        a.options = ComposeOptions {
            crossfade: true,
            start_styles: StyleSnapshot::opacity(0.0),
            end_styles: StyleSnapshot::opacity(1.0),
        };
        let style = compose_transform_relative(&a);
        assert_eq!(style.opacity, Some(0.5));
    }

    #[test]
    fn test_degenerate_end_rect_is_finite() {
        let start = rect(0.0, 0.0, 0.0, 100.0);
        let end = rect(0.0, 0.0, 200.0, 0.0);
        let a = ComposeArgs {
            start,
            end,
            geometry: compute_relative_geometry(&GeometryRequest {
                start,
                end,
                entering: true,
                anchor: Anchor::Center,
                scale_mode: ScaleMode::Uniform,
            }),
            progress: 0.25,
            range: ProgressRange::Enter,
            options: ComposeOptions::default(),
        };
        let t = absolute_transform_values(&a);
        assert!(t.scale_x.is_finite());
        assert!(t.scale_y.is_finite());
        let t = relative_transform_values(&a);
        assert!(t.scale_x.is_finite());
    }

    #[test]
    fn test_neutral_style_applies_nothing() {
        assert_eq!(ElementStyle::neutral(), ElementStyle::default());
    }
}
