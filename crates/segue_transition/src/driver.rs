//! Value drivers
//!
//! A driver animates one scalar toward a target under either spring
//! physics or a fixed-duration timing curve, and carries the transition's
//! completion callback. The callback contract is exactly-once: `true` when
//! the motion ran to completion, `false` when a newer transition
//! superseded it or its screen was torn down mid-flight.

use crate::easing::Easing;
use crate::spring::{Spring, SpringConfig};
use serde::{Deserialize, Serialize};

/// Completion callback invoked exactly once per transition
pub type FinishCallback = Box<dyn FnOnce(bool) + Send>;

/// How a transition's value moves toward its target.
///
/// `Option<TransitionSpec>` is the full caller-facing shape: `None` means
/// "instant" - the target applies immediately and the finish callback
/// runs synchronously, satisfying the same contract as an animated
/// transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransitionSpec {
    Spring { config: SpringConfig },
    Timing { duration_ms: f32, easing: Easing },
}

impl TransitionSpec {
    pub fn spring(config: SpringConfig) -> Self {
        Self::Spring { config }
    }

    pub fn timing(duration_ms: f32, easing: Easing) -> Self {
        Self::Timing {
            duration_ms,
            easing,
        }
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::Spring {
            config: SpringConfig::default(),
        }
    }
}

enum Motion {
    Spring(Spring),
    Timing {
        from: f32,
        to: f32,
        elapsed_ms: f32,
        duration_ms: f32,
        easing: Easing,
    },
}

/// One in-flight scalar animation
pub(crate) struct ValueDriver {
    motion: Motion,
    on_finish: Option<FinishCallback>,
}

impl ValueDriver {
    pub fn new(
        spec: &TransitionSpec,
        from: f32,
        to: f32,
        velocity: Option<f32>,
        on_finish: Option<FinishCallback>,
    ) -> Self {
        let motion = match spec {
            TransitionSpec::Spring { config } => {
                let mut spring = Spring::new(*config, from);
                spring.set_target(to);
                if let Some(v) = velocity {
                    spring.set_velocity(v);
                }
                Motion::Spring(spring)
            }
            TransitionSpec::Timing {
                duration_ms,
                easing,
            } => Motion::Timing {
                from,
                to,
                elapsed_ms: 0.0,
                duration_ms: duration_ms.max(0.0),
                easing: *easing,
            },
        };
        Self { motion, on_finish }
    }

    pub fn target(&self) -> f32 {
        match &self.motion {
            Motion::Spring(spring) => spring.target(),
            Motion::Timing { to, .. } => *to,
        }
    }

    /// Current velocity, inherited by a superseding spring driver
    pub fn velocity(&self) -> f32 {
        match &self.motion {
            Motion::Spring(spring) => spring.velocity(),
            Motion::Timing { .. } => 0.0,
        }
    }

    /// Advance by `dt_ms`; returns the current value and whether the
    /// driver just finished.
    pub fn step(&mut self, dt_ms: f32) -> (f32, bool) {
        match &mut self.motion {
            Motion::Spring(spring) => {
                spring.step(dt_ms / 1000.0);
                (spring.value(), spring.is_settled())
            }
            Motion::Timing {
                from,
                to,
                elapsed_ms,
                duration_ms,
                easing,
            } => {
                *elapsed_ms += dt_ms;
                if *elapsed_ms >= *duration_ms {
                    (*to, true)
                } else {
                    let t = easing.apply(*elapsed_ms / *duration_ms);
                    (*from + (*to - *from) * t, false)
                }
            }
        }
    }

    /// Take the completion callback (it fires at most once)
    pub fn take_finish(&mut self) -> Option<FinishCallback> {
        self.on_finish.take()
    }
}
