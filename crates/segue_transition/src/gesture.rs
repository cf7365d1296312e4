//! Gesture-to-progress mapping and direction gating
//!
//! A drag only becomes a dismiss gesture when it clears three gates:
//! movement past a minimum threshold on a dominant axis, that axis/sign
//! among the configured directions, and any nested scrollable already at
//! its boundary in that direction (so the dismiss gesture cannot steal a
//! scroll gesture). Once active, the session is the single writer for its
//! screen's gesture fields.

use std::sync::Arc;

use tracing::debug;

use segue_core::{nonzero_denom, ScreenKey, ScreenLayout};

use crate::driver::TransitionSpec;
use crate::physics::{cancel_velocity, release_velocity, should_dismiss, DismissalInput};
use crate::scheduler::{GestureResetVelocities, TransitionScheduler};
use crate::state::{DismissDirection, DismissDirections, ScreenStateStore};

/// Minimum movement (px) on the dominant axis before a drag activates
pub const ACTIVATION_THRESHOLD: f32 = 5.0;

/// Whether nested scrollable content sits at each of its boundaries.
///
/// A screen without scrollable content is at every boundary - the
/// default gates nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollEdges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for ScrollEdges {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }
}

impl ScrollEdges {
    /// Whether a drag toward `direction` is free to begin: the content
    /// cannot scroll any further that way.
    pub fn at_boundary(&self, direction: DismissDirection) -> bool {
        match direction {
            // Dragging the screen down reveals what is above the content.
            DismissDirection::Down => self.top,
            DismissDirection::Up => self.bottom,
            DismissDirection::Right => self.left,
            DismissDirection::Left => self.right,
        }
    }
}

/// Signed translation component along a direction (positive = toward it)
fn directional_translation(direction: DismissDirection, x: f32, y: f32) -> f32 {
    let raw = if direction.is_horizontal() { x } else { y };
    raw * direction.sign()
}

fn dimension_for(direction: DismissDirection, layout: ScreenLayout) -> f32 {
    if direction.is_horizontal() {
        layout.width
    } else {
        layout.height
    }
}

/// Decide whether a drag activates, and in which direction.
///
/// The dominant axis is chosen by magnitude; activation requires the
/// threshold, an allowed direction, and the scroll boundary for that
/// direction.
pub fn resolve_activation(
    dx: f32,
    dy: f32,
    allowed: DismissDirections,
    edges: &ScrollEdges,
) -> Option<DismissDirection> {
    let direction = if dx.abs() >= dy.abs() {
        if dx.abs() < ACTIVATION_THRESHOLD {
            return None;
        }
        if dx > 0.0 {
            DismissDirection::Right
        } else {
            DismissDirection::Left
        }
    } else {
        if dy.abs() < ACTIVATION_THRESHOLD {
            return None;
        }
        if dy > 0.0 {
            DismissDirection::Down
        } else {
            DismissDirection::Up
        }
    };

    (allowed.contains(direction) && edges.at_boundary(direction)).then_some(direction)
}

/// Map a live translation to the screen's progress value.
///
/// Each permitted direction contributes `clamp(translation/dimension,
/// 0, 1)`; the maximum across them drives `progress = 1 - max`, so
/// dragging toward dismissal pulls progress down from 1.
pub fn progress_from_translation(
    x: f32,
    y: f32,
    layout: ScreenLayout,
    allowed: DismissDirections,
) -> f32 {
    let mut max_fraction = 0.0f32;
    for direction in DismissDirection::ALL {
        if !allowed.contains(direction) {
            continue;
        }
        let t = directional_translation(direction, x, y);
        let dim = nonzero_denom(dimension_for(direction, layout));
        max_fraction = max_fraction.max((t / dim).clamp(0.0, 1.0));
    }
    1.0 - max_fraction
}

/// Translation normalized against a screen dimension into `[-1, 1]`
pub fn normalized(value: f32, dimension: f32) -> f32 {
    (value / nonzero_denom(dimension)).clamp(-1.0, 1.0)
}

/// What a released gesture resolved to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The drag never activated; nothing was written
    Inactive,
    /// Below the dismissal threshold; values animate back toward open
    Cancelled,
    /// Past the threshold; the host should now request the screen's
    /// removal
    Dismissed,
}

/// One pan recognizer's session over a screen's gesture fields.
///
/// Beginning a session interrupts any gesture reset still animating from
/// a previous release (its barrier aborts), upholding the single-writer
/// convention per axis.
pub struct GestureSession {
    screen: ScreenKey,
    layout: ScreenLayout,
    allowed: DismissDirections,
    states: Arc<ScreenStateStore>,
    direction: Option<DismissDirection>,
}

impl GestureSession {
    pub fn begin(
        scheduler: &mut TransitionScheduler,
        screen: &str,
        layout: ScreenLayout,
        allowed: DismissDirections,
    ) -> Self {
        scheduler.interrupt_gesture(screen);
        Self {
            screen: screen.to_string(),
            layout,
            allowed,
            states: Arc::clone(scheduler.states()),
            direction: None,
        }
    }

    /// Whether the drag has activated
    pub fn is_active(&self) -> bool {
        self.direction.is_some()
    }

    /// Feed one translation sample. Returns whether the gesture is (now)
    /// active; inactive samples write nothing.
    pub fn sample(&mut self, dx: f32, dy: f32, edges: &ScrollEdges) -> bool {
        if self.direction.is_none() {
            match resolve_activation(dx, dy, self.allowed, edges) {
                Some(direction) => {
                    debug!(screen = %self.screen, ?direction, "gesture activated");
                    self.direction = Some(direction);
                }
                None => return false,
            }
        }

        let direction = self.direction;
        let progress = progress_from_translation(dx, dy, self.layout, self.allowed);
        let (norm_x, norm_y) = (
            normalized(dx, self.layout.width),
            normalized(dy, self.layout.height),
        );
        self.states.modify(&self.screen, |s| {
            s.gesture.dragging = true;
            s.gesture.direction = direction;
            s.gesture.x = dx;
            s.gesture.y = dy;
            s.gesture.norm_x = norm_x;
            s.gesture.norm_y = norm_y;
            s.progress = progress;
        });
        true
    }

    /// Release the drag with the final per-axis velocities (px/s).
    ///
    /// On dismissal the gesture values animate to zero seeded with the
    /// scaled release velocity; on cancel they animate back with a
    /// velocity forced toward zero, and progress returns to open.
    pub fn release(
        self,
        velocity_x: f32,
        velocity_y: f32,
        scheduler: &mut TransitionScheduler,
        spec: Option<&TransitionSpec>,
    ) -> ReleaseOutcome {
        let Some(direction) = self.direction else {
            return ReleaseOutcome::Inactive;
        };

        let state = self.states.ensure(&self.screen);
        let (translation, velocity) = if direction.is_horizontal() {
            (state.gesture.x, velocity_x)
        } else {
            (state.gesture.y, velocity_y)
        };
        let size = dimension_for(direction, self.layout);

        let dismiss = should_dismiss(&DismissalInput {
            translation,
            velocity,
            size,
            direction_sign: direction.sign(),
        });
        debug!(screen = %self.screen, ?direction, translation, velocity, dismiss, "gesture released");

        self.states.modify(&self.screen, |s| {
            s.gesture.dragging = false;
            s.gesture.dismissing = dismiss;
        });

        let velocities = if dismiss {
            GestureResetVelocities {
                x: release_velocity(velocity_x),
                y: release_velocity(velocity_y),
                norm_x: release_velocity(velocity_x) / nonzero_denom(self.layout.width),
                norm_y: release_velocity(velocity_y) / nonzero_denom(self.layout.height),
            }
        } else {
            GestureResetVelocities {
                x: cancel_velocity(state.gesture.x, velocity_x),
                y: cancel_velocity(state.gesture.y, velocity_y),
                norm_x: cancel_velocity(state.gesture.norm_x, velocity_x),
                norm_y: cancel_velocity(state.gesture.norm_y, velocity_y),
            }
        };
        scheduler.reset_gesture(&self.screen, spec, velocities, None);

        if dismiss {
            ReleaseOutcome::Dismissed
        } else {
            // Below the threshold: the screen snaps back open.
            scheduler.animate_progress(&self.screen, 1.0, spec, None);
            ReleaseOutcome::Cancelled
        }
    }
}
