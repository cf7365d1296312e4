//! Release physics
//!
//! The dismissal decision projects translation and velocity into one
//! normalized, direction-signed value. Velocity can push a borderline
//! drag over the line, but never dismisses on its own: a fling with no
//! meaningful translation stays on screen.

use segue_core::nonzero_denom;

/// Velocity clamp in normalized units (screen sizes per second)
pub const VELOCITY_CAP: f32 = 2.0;

/// How much the clamped velocity contributes to the projection
pub const VELOCITY_WEIGHT: f32 = 0.3;

/// Translation below this fraction of the screen never dismisses
pub const MIN_TRANSLATION: f32 = 0.01;

/// Projection above which a release dismisses
pub const DISMISS_THRESHOLD: f32 = 0.5;

/// Scale applied to the release velocity when the dismissal animation
/// continues the fling
pub const RELEASE_VELOCITY_SCALE: f32 = 0.5;

/// One release sample along the gesture's dominant axis
#[derive(Clone, Copy, Debug)]
pub struct DismissalInput {
    /// Translation along the axis in pixels
    pub translation: f32,
    /// Release velocity along the axis in pixels per second
    pub velocity: f32,
    /// Screen dimension along the axis in pixels
    pub size: f32,
    /// Sign of the permitted direction along the axis (+1 or -1)
    pub direction_sign: f32,
}

/// Decide whether a released gesture dismisses its screen.
///
/// `projected = translation/size + clamp(velocity/size, ±cap) × weight`;
/// dismiss iff the translation is in the permitted sign, exceeds the
/// minimum meaningful fraction, and `projected × sign(translation)`
/// clears the threshold.
pub fn should_dismiss(input: &DismissalInput) -> bool {
    let size = nonzero_denom(input.size);
    let t = input.translation / size;

    // Translation must be meaningful and in the permitted direction;
    // velocity alone must never trigger dismissal.
    if t * input.direction_sign <= MIN_TRANSLATION {
        return false;
    }

    let v = (input.velocity / size).clamp(-VELOCITY_CAP, VELOCITY_CAP);
    let projected = t + v * VELOCITY_WEIGHT;
    projected * t.signum() > DISMISS_THRESHOLD
}

/// Velocity seeding the gesture reset after a dismissal, so the motion
/// reads as a continuation of the fling
pub fn release_velocity(velocity: f32) -> f32 {
    velocity * RELEASE_VELOCITY_SCALE
}

/// Velocity seeding the gesture reset after a cancel: always points back
/// toward zero regardless of the release velocity's sign.
pub fn cancel_velocity(displacement: f32, velocity: f32) -> f32 {
    if displacement == 0.0 {
        return 0.0;
    }
    -displacement.signum() * velocity.abs()
}
