//! Transition scheduler
//!
//! Owns every in-flight value driver and updates them each frame. One
//! driver per `(screen, slot)`: writing a new target to a slot supersedes
//! the previous driver (its callback fires once with `finished = false`,
//! and a spring successor inherits its velocity), so cancellation needs
//! no explicit token - the next tick simply follows the newest target.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use smallvec::SmallVec;
use tracing::debug;

use segue_core::{FrameClock, ScreenKey, StdClock};

use crate::barrier::FinishBarrier;
use crate::driver::{FinishCallback, TransitionSpec, ValueDriver};
use crate::state::ScreenStateStore;

new_key_type! {
    pub struct DriverId;
}

/// Which per-screen value a driver animates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueSlot {
    Progress,
    GestureX,
    GestureY,
    GestureNormX,
    GestureNormY,
}

/// Per-axis velocities seeding a gesture reset
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureResetVelocities {
    pub x: f32,
    pub y: f32,
    pub norm_x: f32,
    pub norm_y: f32,
}

/// The scheduler that ticks all active transition drivers
pub struct TransitionScheduler {
    drivers: SlotMap<DriverId, ValueDriver>,
    targets: SecondaryMap<DriverId, (ScreenKey, ValueSlot)>,
    slots: FxHashMap<(ScreenKey, ValueSlot), DriverId>,
    states: Arc<ScreenStateStore>,
    clock: Box<dyn FrameClock>,
    last_ms: f64,
}

impl TransitionScheduler {
    pub fn new(states: Arc<ScreenStateStore>) -> Self {
        Self::with_clock(states, Box::new(StdClock::new()))
    }

    /// Scheduler with a caller-supplied clock (scripted in tests)
    pub fn with_clock(states: Arc<ScreenStateStore>, clock: Box<dyn FrameClock>) -> Self {
        let last_ms = clock.now_ms();
        Self {
            drivers: SlotMap::with_key(),
            targets: SecondaryMap::new(),
            slots: FxHashMap::default(),
            states,
            clock,
            last_ms,
        }
    }

    pub fn states(&self) -> &Arc<ScreenStateStore> {
        &self.states
    }

    /// Animate a screen's progress toward `target`.
    ///
    /// `None` spec applies the target immediately and runs the finish
    /// callback synchronously with `finished = true` - instant
    /// transitions satisfy the same contract as animated ones.
    pub fn animate_progress(
        &mut self,
        screen: &str,
        target: f32,
        spec: Option<&TransitionSpec>,
        on_finish: Option<FinishCallback>,
    ) {
        self.animate_with_velocity(screen, ValueSlot::Progress, target, None, spec, on_finish);
    }

    /// Animate one slot toward `target`, superseding any driver already
    /// animating it
    pub fn animate(
        &mut self,
        screen: &str,
        slot: ValueSlot,
        target: f32,
        spec: Option<&TransitionSpec>,
        on_finish: Option<FinishCallback>,
    ) {
        self.animate_with_velocity(screen, slot, target, None, spec, on_finish);
    }

    /// Like [`TransitionScheduler::animate`], with an explicit starting
    /// velocity (a released fling). Without one, a superseded spring's
    /// velocity is inherited.
    pub fn animate_with_velocity(
        &mut self,
        screen: &str,
        slot: ValueSlot,
        target: f32,
        velocity: Option<f32>,
        spec: Option<&TransitionSpec>,
        on_finish: Option<FinishCallback>,
    ) {
        let inherited = self.supersede(screen, slot);

        let Some(spec) = spec else {
            write_slot(&self.states, screen, slot, target);
            if slot == ValueSlot::Progress {
                self.states.modify(screen, |s| s.animating = false);
            }
            if let Some(cb) = on_finish {
                cb(true);
            }
            return;
        };

        let from = read_slot(&self.states, screen, slot);
        debug!(screen, ?slot, from, target, "start driver");
        let driver = ValueDriver::new(spec, from, target, velocity.or(inherited), on_finish);
        let id = self.drivers.insert(driver);
        self.targets.insert(id, (screen.to_string(), slot));
        self.slots.insert((screen.to_string(), slot), id);

        if slot == ValueSlot::Progress {
            self.states.modify(screen, |s| s.animating = true);
        }
    }

    /// Animate all four gesture axes back to zero, then clear the gesture
    /// flags in one follow-up once every axis reports finished. The
    /// follow-up never runs if any axis is superseded mid-reset.
    pub fn reset_gesture(
        &mut self,
        screen: &str,
        spec: Option<&TransitionSpec>,
        velocities: GestureResetVelocities,
        on_done: Option<Box<dyn FnOnce() + Send>>,
    ) {
        let states = Arc::clone(&self.states);
        let key = screen.to_string();
        let barrier = FinishBarrier::new(4, move || {
            states.modify(&key, |s| {
                s.gesture.dragging = false;
                s.gesture.dismissing = false;
                s.gesture.direction = None;
            });
            if let Some(done) = on_done {
                done();
            }
        });

        let axes = [
            (ValueSlot::GestureX, velocities.x),
            (ValueSlot::GestureY, velocities.y),
            (ValueSlot::GestureNormX, velocities.norm_x),
            (ValueSlot::GestureNormY, velocities.norm_y),
        ];
        for (slot, velocity) in axes {
            self.animate_with_velocity(
                screen,
                slot,
                0.0,
                Some(velocity),
                spec,
                Some(barrier.callback()),
            );
        }
    }

    /// Advance all drivers using the wall clock
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        let dt = (now - self.last_ms) as f32;
        self.last_ms = now;
        self.advance(dt);
    }

    /// Advance all drivers by `dt_ms`, writing values into the state
    /// store and firing completion callbacks for drivers that settled
    pub fn advance(&mut self, dt_ms: f32) {
        let states = Arc::clone(&self.states);
        let mut finished: SmallVec<[DriverId; 4]> = SmallVec::new();

        for (id, driver) in self.drivers.iter_mut() {
            let (value, done) = driver.step(dt_ms);
            if let Some((screen, slot)) = self.targets.get(id) {
                write_slot(&states, screen, *slot, value);
            }
            if done {
                finished.push(id);
            }
        }

        for id in finished {
            let driver = self.drivers.remove(id);
            if let Some((screen, slot)) = self.targets.remove(id) {
                self.slots.remove(&(screen.clone(), slot));
                if slot == ValueSlot::Progress {
                    self.states.modify(&screen, |s| s.animating = false);
                }
            }
            if let Some(mut driver) = driver {
                if let Some(cb) = driver.take_finish() {
                    cb(true);
                }
            }
        }
    }

    /// Whether any driver is still in flight
    pub fn has_active(&self) -> bool {
        !self.drivers.is_empty()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    /// Drop every driver for `screen`, firing callbacks with
    /// `finished = false`. Part of the explicit teardown path - a torn
    /// down screen's barriers must not leak armed callbacks.
    pub fn clear_screen(&mut self, screen: &str) {
        let ids: SmallVec<[DriverId; 4]> = self
            .targets
            .iter()
            .filter(|(_, (key, _))| key.as_str() == screen)
            .map(|(id, _)| id)
            .collect();

        for id in ids {
            if let Some((screen, slot)) = self.targets.remove(id) {
                self.slots.remove(&(screen, slot));
            }
            if let Some(mut driver) = self.drivers.remove(id) {
                if let Some(cb) = driver.take_finish() {
                    cb(false);
                }
            }
        }
    }

    /// Supersede every gesture-axis driver for `screen` (fired with
    /// `finished = false`, aborting any pending reset barrier). Called
    /// when a new pan recognizer takes over the screen's gesture fields.
    pub fn interrupt_gesture(&mut self, screen: &str) {
        for slot in [
            ValueSlot::GestureX,
            ValueSlot::GestureY,
            ValueSlot::GestureNormX,
            ValueSlot::GestureNormY,
        ] {
            self.supersede(screen, slot);
        }
    }

    /// Supersede the driver for a slot, returning its velocity
    fn supersede(&mut self, screen: &str, slot: ValueSlot) -> Option<f32> {
        let id = self.slots.remove(&(screen.to_string(), slot))?;
        self.targets.remove(id);
        let mut driver = self.drivers.remove(id)?;
        let velocity = driver.velocity();
        if let Some(cb) = driver.take_finish() {
            cb(false);
        }
        Some(velocity)
    }
}

fn read_slot(states: &ScreenStateStore, screen: &str, slot: ValueSlot) -> f32 {
    let state = states.ensure(screen);
    match slot {
        ValueSlot::Progress => state.progress,
        ValueSlot::GestureX => state.gesture.x,
        ValueSlot::GestureY => state.gesture.y,
        ValueSlot::GestureNormX => state.gesture.norm_x,
        ValueSlot::GestureNormY => state.gesture.norm_y,
    }
}

fn write_slot(states: &ScreenStateStore, screen: &str, slot: ValueSlot, value: f32) {
    states.modify(screen, |s| match slot {
        ValueSlot::Progress => s.progress = value.clamp(0.0, 1.0),
        ValueSlot::GestureX => s.gesture.x = value,
        ValueSlot::GestureY => s.gesture.y = value,
        ValueSlot::GestureNormX => s.gesture.norm_x = value.clamp(-1.0, 1.0),
        ValueSlot::GestureNormY => s.gesture.norm_y = value.clamp(-1.0, 1.0),
    });
}
