//! Whole-screen content geometry
//!
//! "Zoom into element" presets transform the *entire destination screen*
//! so that one of its elements lands exactly over the source element at
//! transition start. Distinct from per-element relative geometry: the
//! pivot is the screen center and a single scalar scale applies.

use segue_core::{MeasuredRect, ScreenLayout};

use crate::anchor::Anchor;
use crate::scale::ScaleMode;

/// Inputs for a content-transform computation
#[derive(Clone, Copy, Debug)]
pub struct ContentGeometryRequest {
    /// Rect of the element at the transition's origin
    pub start: MeasuredRect,
    /// Rect of the matched element on the screen being transformed
    pub end: MeasuredRect,
    pub entering: bool,
    /// Layout of the screen being transformed
    pub screen: ScreenLayout,
    pub anchor: Anchor,
    pub scale_mode: ScaleMode,
}

/// Whole-screen translate/scale (screen-center pivot)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentGeometry {
    pub tx: f32,
    pub ty: f32,
    pub scale: f32,
    pub entering: bool,
}

/// Solve the screen translation that places the scaled end anchor at the
/// start anchor's absolute position.
///
/// The end anchor's offset from the screen center is scaled by `s`
/// (scale applies about the screen center), then the translation closes
/// the remaining gap to the start anchor.
pub fn compute_content_geometry(req: &ContentGeometryRequest) -> ContentGeometry {
    let scale = req.scale_mode.scalar_factor(&req.start, &req.end);

    let (screen_cx, screen_cy) = req.screen.center();
    let (start_ax, start_ay) = req.anchor.point_in(&req.start);
    let (end_ax, end_ay) = req.anchor.point_in(&req.end);

    let tx = start_ax - screen_cx - (end_ax - screen_cx) * scale;
    let ty = start_ay - screen_cy - (end_ay - screen_cy) * scale;

    ContentGeometry {
        tx,
        ty,
        scale,
        entering: req.entering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> MeasuredRect {
        MeasuredRect::from_origin_size(x, y, w, h)
    }

    #[test]
    fn test_coincident_element_is_identity() {
        let r = rect(100.0, 300.0, 80.0, 80.0);
        let g = compute_content_geometry(&ContentGeometryRequest {
            start: r,
            end: r,
            entering: true,
            screen: ScreenLayout::new(400.0, 800.0),
            anchor: Anchor::Center,
            scale_mode: ScaleMode::Uniform,
        });
        assert_eq!(g.scale, 1.0);
        assert_eq!(g.tx, 0.0);
        assert_eq!(g.ty, 0.0);
    }

    #[test]
    fn test_scaled_anchor_lands_on_start() {
        let start = rect(20.0, 60.0, 60.0, 60.0);
        let end = rect(100.0, 400.0, 120.0, 120.0);
        let screen = ScreenLayout::new(400.0, 800.0);
        let g = compute_content_geometry(&ContentGeometryRequest {
            start,
            end,
            entering: true,
            screen,
            anchor: Anchor::Center,
            scale_mode: ScaleMode::Uniform,
        });

        // Transforming the end anchor by (scale about screen center, then
        // translate) must land it on the start anchor.
        let (cx, cy) = screen.center();
        let (eax, eay) = Anchor::Center.point_in(&end);
        let landed_x = cx + (eax - cx) * g.scale + g.tx;
        let landed_y = cy + (eay - cy) * g.scale + g.ty;
        let (sax, say) = Anchor::Center.point_in(&start);
        assert!((landed_x - sax).abs() < 1e-3);
        assert!((landed_y - say).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_end_is_finite() {
        let g = compute_content_geometry(&ContentGeometryRequest {
            start: rect(0.0, 0.0, 100.0, 100.0),
            end: rect(0.0, 0.0, 0.0, 0.0),
            entering: false,
            screen: ScreenLayout::new(400.0, 800.0),
            anchor: Anchor::Center,
            scale_mode: ScaleMode::Uniform,
        });
        assert!(g.scale.is_finite());
        assert!(g.tx.is_finite());
        assert!(g.ty.is_finite());
    }
}
