//! Spring physics
//!
//! RK4-integrated damped springs drive progress and gesture values. A
//! spring is interruptible: retargeting keeps the current velocity, so a
//! superseding transition continues the visible motion instead of
//! restarting it.

use serde::{Deserialize, Serialize};

use segue_core::nonzero_denom;

/// Longest step the integrator will take in one call. Larger frame gaps
/// are clamped rather than subdivided; the spring is converging anyway.
const MAX_STEP_SECS: f32 = 0.064;

/// Spring tuning parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Displacement below which the spring counts as at rest
    pub rest_displacement: f32,
    /// Speed below which the spring counts as at rest
    pub rest_velocity: f32,
}

impl SpringConfig {
    /// Soft, slow settle
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            ..Default::default()
        }
    }

    /// Pronounced overshoot
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            ..Default::default()
        }
    }

    /// Quick settle with minimal overshoot
    pub fn stiff() -> Self {
        Self {
            stiffness: 210.0,
            damping: 20.0,
            ..Default::default()
        }
    }

    /// Near-critically damped, fastest usable settle
    pub fn snappy() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            ..Default::default()
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            rest_displacement: 0.001,
            rest_velocity: 0.001,
        }
    }
}

/// A damped spring animating one value toward a target
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget the spring, keeping the current velocity
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Seed the velocity, e.g. from a released gesture
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// At rest within the configured thresholds
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_displacement
            && self.velocity.abs() < self.config.rest_velocity
    }

    /// Advance the spring by `dt` seconds (RK4)
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let dt = dt.clamp(0.0, MAX_STEP_SECS);
        let k = self.config.stiffness;
        let c = self.config.damping;
        let m = nonzero_denom(self.config.mass);
        let target = self.target;
        let accel = |x: f32, v: f32| (-k * (x - target) - c * v) / m;

        let (x0, v0) = (self.value, self.velocity);

        let v1 = v0;
        let a1 = accel(x0, v0);
        let v2 = v0 + a1 * dt * 0.5;
        let a2 = accel(x0 + v1 * dt * 0.5, v2);
        let v3 = v0 + a2 * dt * 0.5;
        let a3 = accel(x0 + v2 * dt * 0.5, v3);
        let v4 = v0 + a3 * dt;
        let a4 = accel(x0 + v3 * dt, v4);

        self.value = x0 + (v1 + 2.0 * v2 + 2.0 * v3 + v4) * dt / 6.0;
        self.velocity = v0 + (a1 + 2.0 * a2 + 2.0 * a3 + a4) * dt / 6.0;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_to_target() {
        let mut spring = Spring::new(SpringConfig::default(), 0.0);
        spring.set_target(1.0);
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 1.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(1.0);
        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }
        let mid_velocity = spring.velocity();
        assert!(mid_velocity > 0.0);

        spring.set_target(-1.0);
        assert_eq!(spring.velocity(), mid_velocity);
    }

    #[test]
    fn test_settled_spring_snaps() {
        let mut spring = Spring::new(SpringConfig::default(), 5.0);
        spring.step(1.0 / 60.0);
        assert_eq!(spring.value(), 5.0);
        assert!(spring.is_settled());
    }

    #[test]
    fn test_zero_mass_is_finite() {
        let config = SpringConfig {
            mass: 0.0,
            ..Default::default()
        };
        let mut spring = Spring::new(config, 0.0);
        spring.set_target(1.0);
        spring.step(1.0 / 60.0);
        assert!(spring.value().is_finite());
        assert!(spring.velocity().is_finite());
    }

    #[test]
    fn test_wobbly_overshoots() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(1.0);
        let mut peak = 0.0f32;
        for _ in 0..240 {
            spring.step(1.0 / 60.0);
            peak = peak.max(spring.value());
        }
        assert!(peak > 1.0, "wobbly preset should overshoot, peak {peak}");
    }
}
