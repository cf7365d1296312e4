//! Segue Geometry Engine
//!
//! Pure math for shared-element transitions:
//!
//! - **Anchors**: nine named pivot points within a rectangle
//! - **Scale modes**: axis-ratio policies for matching two rect sizes
//! - **Relative geometry**: per-element translate/scale between two rects
//! - **Content geometry**: whole-screen transforms that land one element
//!   of the incoming screen exactly over its counterpart
//! - **Composers**: progress-interpolated transform/size/content styles
//!
//! Everything here is a pure function of its inputs - no registries, no
//! clocks, no I/O - so it is safe to re-run every animation frame.
//!
//! # Example
//!
//! ```rust
//! use segue_core::MeasuredRect;
//! use segue_geometry::{compute_relative_geometry, Anchor, GeometryRequest, ScaleMode};
//!
//! let start = MeasuredRect::from_origin_size(0.0, 0.0, 100.0, 100.0);
//! let end = MeasuredRect::from_origin_size(40.0, 80.0, 200.0, 200.0);
//!
//! let geometry = compute_relative_geometry(&GeometryRequest {
//!     start,
//!     end,
//!     entering: true,
//!     anchor: Anchor::Center,
//!     scale_mode: ScaleMode::Match,
//! });
//!
//! assert_eq!(geometry.scale_x, 0.5);
//! ```

pub mod anchor;
pub mod compose;
pub mod content;
pub mod interpolate;
pub mod relative;
pub mod scale;

pub use anchor::Anchor;
pub use compose::{
    absolute_size_values, absolute_transform_values, compose_content_style,
    compose_size_absolute, compose_size_relative, compose_transform_absolute,
    compose_transform_relative, ComposeArgs, ComposeOptions, ContentComposeArgs, ElementStyle,
    RectValues, relative_size_values, relative_transform_values, SizeValues, TransformValues,
};
pub use content::{compute_content_geometry, ContentGeometry, ContentGeometryRequest};
pub use interpolate::{interpolate, ProgressRange};
pub use relative::{compute_relative_geometry, GeometryRequest, RelativeGeometry};
pub use scale::ScaleMode;
