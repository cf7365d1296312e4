//! Per-element relative geometry
//!
//! Turns two absolute rects plus an anchor/scale policy into the
//! translate/scale an element needs to visually occupy the other end of
//! its match. The same geometry serves both directions - composers branch
//! on `entering` to play it forward or mirrored.

use segue_core::MeasuredRect;

use crate::anchor::Anchor;
use crate::scale::ScaleMode;

/// Inputs for a relative geometry computation
#[derive(Clone, Copy, Debug)]
pub struct GeometryRequest {
    /// Rect of the element at the transition's origin
    pub start: MeasuredRect,
    /// Natural rect of the element being transformed
    pub end: MeasuredRect,
    /// Direction of the transition this geometry serves
    pub entering: bool,
    pub anchor: Anchor,
    pub scale_mode: ScaleMode,
}

/// Translate/scale taking the end rect onto the start rect
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativeGeometry {
    pub dx: f32,
    pub dy: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub entering: bool,
}

/// Compute the offset and scale that place the end rect's anchor exactly
/// on the start rect's anchor.
///
/// The delta is start-anchor minus end-center, corrected by the end
/// rect's own anchor-to-center offset scaled by the chosen factor. That
/// correction is what keeps the anchor point - rather than the bounding
/// box center - as the pivot the two elements snap together on.
pub fn compute_relative_geometry(req: &GeometryRequest) -> RelativeGeometry {
    let (scale_x, scale_y) = req.scale_mode.factors(&req.start, &req.end);

    let (start_ax, start_ay) = req.anchor.point_in(&req.start);
    let (end_cx, end_cy) = req.end.page_center();
    let (end_ax, end_ay) = req.anchor.point_in(&req.end);

    let dx = (start_ax - end_cx) - (end_ax - end_cx) * scale_x;
    let dy = (start_ay - end_cy) - (end_ay - end_cy) * scale_y;

    RelativeGeometry {
        dx,
        dy,
        scale_x,
        scale_y,
        entering: req.entering,
    }
}
