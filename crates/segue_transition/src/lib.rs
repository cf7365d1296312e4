//! Segue Transition Engine
//!
//! Per-screen transition state and the scheduler that drives it:
//!
//! - **Screen state**: progress, lifecycle flags, live gesture vector
//! - **Drivers**: RK4 springs and timing curves with exactly-once
//!   completion callbacks, superseded-on-retarget
//! - **Gesture physics**: activation gating, progress mapping, and
//!   velocity-based dismissal decisions
//! - **Pipeline**: frame-coherent snapshots feeding style callbacks
//! - **Lifecycle**: deferred removal around close animations
//!
//! Two execution contexts cooperate: discrete control events (mount,
//! removal requests, tap-to-activate) and the continuous animation
//! context (`tick`/gesture samples). They share state only through
//! replace-on-write cells, so neither ever reads a torn value.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use segue_store::BoundLinkStore;
//! use segue_transition::{ScreenLifecycle, ScreenStateStore, TransitionScheduler, TransitionSpec};
//!
//! let states = Arc::new(ScreenStateStore::new());
//! let scheduler = Arc::new(Mutex::new(TransitionScheduler::new(Arc::clone(&states))));
//! let lifecycle = ScreenLifecycle::new(Arc::new(BoundLinkStore::new()), scheduler.clone());
//!
//! lifecycle.screen_mounted("detail", None, Some(&TransitionSpec::default()), None);
//!
//! // Frame loop: tick until the open spring settles.
//! for _ in 0..240 {
//!     scheduler.lock().unwrap().advance(1000.0 / 60.0);
//! }
//! assert_eq!(states.get("detail").unwrap().progress, 1.0);
//! ```

pub mod barrier;
pub mod driver;
pub mod easing;
pub mod gesture;
pub mod lifecycle;
pub mod physics;
pub mod pipeline;
pub mod scheduler;
pub mod spring;
pub mod state;

pub use barrier::FinishBarrier;
pub use driver::{FinishCallback, TransitionSpec};
pub use easing::Easing;
pub use gesture::{
    normalized, progress_from_translation, resolve_activation, GestureSession, ReleaseOutcome,
    ScrollEdges, ACTIVATION_THRESHOLD,
};
pub use lifecycle::{RemovalDecision, ScreenLifecycle, SchedulerHandle};
pub use physics::{
    cancel_velocity, release_velocity, should_dismiss, DismissalInput, DISMISS_THRESHOLD,
};
pub use pipeline::{
    FrameInput, PipelineSnapshot, ScreenAnimationPipeline, StyleFrame, StyleMap, BACKDROP_SLOT,
    CONTENT_SLOT,
};
pub use scheduler::{
    DriverId, GestureResetVelocities, TransitionScheduler, ValueSlot,
};
pub use spring::{Spring, SpringConfig};
pub use state::{
    DismissDirection, DismissDirections, GestureVector, ScreenStateStore, ScreenTransitionState,
};
