//! Screen lifecycle orchestration
//!
//! Mount starts the open transition; a removal request is intercepted so
//! the close transition can run first, and the host's removal dispatch is
//! invoked only once the close animation reports finished. Teardown of
//! both stores happens in one place, [`ScreenLifecycle::finalize_removal`],
//! after the host has actually removed the screen.

use std::sync::{Arc, Mutex};

use tracing::debug;

use segue_core::{
    ElementHandle, MeasurementProvider, ScreenKey, SegueError, StyleSnapshot,
};
use segue_store::BoundLinkStore;

use crate::driver::{FinishCallback, TransitionSpec};
use crate::scheduler::TransitionScheduler;
use crate::state::ScreenStateStore;

/// Shared handle to the scheduler, for callers living on the control
/// context (the frame loop ticks it from the animation context)
pub type SchedulerHandle = Arc<Mutex<TransitionScheduler>>;

/// Whether a requested removal may proceed now or must wait for the
/// close animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalDecision {
    /// No animation configured: the screen was closed synchronously and
    /// removal already ran
    Immediate,
    /// A close animation is in flight; removal runs from its finish
    /// callback
    Deferred,
}

/// Orchestrates open/close transitions around the host's screen lifecycle
pub struct ScreenLifecycle {
    links: Arc<BoundLinkStore>,
    states: Arc<ScreenStateStore>,
    scheduler: SchedulerHandle,
}

impl ScreenLifecycle {
    pub fn new(links: Arc<BoundLinkStore>, scheduler: SchedulerHandle) -> Self {
        let states = Arc::clone(scheduler.lock().unwrap().states());
        Self {
            links,
            states,
            scheduler,
        }
    }

    pub fn links(&self) -> &Arc<BoundLinkStore> {
        &self.links
    }

    pub fn states(&self) -> &Arc<ScreenStateStore> {
        &self.states
    }

    /// Start the open transition for a freshly mounted screen.
    ///
    /// The screen's state is created (progress 0, entering) and progress
    /// animates toward 1; the `entering` flag clears when the transition
    /// finishes. `on_finish` fires exactly once with the final state.
    pub fn screen_mounted(
        &self,
        key: &str,
        route: Option<&str>,
        spec: Option<&TransitionSpec>,
        on_finish: Option<FinishCallback>,
    ) {
        debug!(key, route, "screen mounted, opening");
        let route = route.map(str::to_string);
        self.states.modify(key, |s| {
            s.entering = true;
            s.closing = false;
            s.route = route;
        });

        let states = Arc::clone(&self.states);
        let k: ScreenKey = key.to_string();
        let wrapped: FinishCallback = Box::new(move |finished| {
            if finished {
                states.modify(&k, |s| s.entering = false);
            }
            if let Some(cb) = on_finish {
                cb(finished);
            }
        });

        self.scheduler
            .lock()
            .unwrap()
            .animate_progress(key, 1.0, spec, Some(wrapped));
    }

    /// Intercept a removal request: mark the screen closing, run the
    /// close transition, and invoke `on_removed` (the host's actual
    /// removal dispatch) only when the animation reports finished.
    ///
    /// With no animation config the target applies immediately and
    /// `on_removed` runs synchronously before this returns.
    pub fn request_removal(
        &self,
        key: &str,
        spec: Option<&TransitionSpec>,
        on_removed: Box<dyn FnOnce() + Send>,
    ) -> Result<RemovalDecision, SegueError> {
        if !self.states.contains(key) {
            return Err(SegueError::UnknownScreen(key.to_string()));
        }

        debug!(key, deferred = spec.is_some(), "removal requested, closing");
        self.states.modify(key, |s| s.closing = true);

        let decision = if spec.is_none() {
            RemovalDecision::Immediate
        } else {
            RemovalDecision::Deferred
        };

        // A superseded close (finished = false) must not remove the
        // screen - the newer transition owns it now.
        let cb: FinishCallback = Box::new(move |finished| {
            if finished {
                on_removed();
            }
        });
        self.scheduler
            .lock()
            .unwrap()
            .animate_progress(key, 0.0, spec, Some(cb));

        Ok(decision)
    }

    /// Tear down everything referencing the screen, once its removal is
    /// final: leftover drivers (fired with `finished = false`), the
    /// screen's links/snapshots/presence, and its transition state. No
    /// stale state outlives its screen.
    pub fn finalize_removal(&self, key: &str) {
        debug!(key, "finalize removal");
        self.scheduler.lock().unwrap().clear_screen(key);
        self.links.clear(key);
        self.states.remove(key);
    }

    /// Measure a mounted element and record it as a snapshot for
    /// `(tag, screen)`. Returns `false` while the element is not yet
    /// measurable; the caller reports again after the next layout pass.
    pub fn capture_snapshot(
        &self,
        tag: &str,
        screen: &str,
        element: ElementHandle,
        provider: &dyn MeasurementProvider,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
    ) -> bool {
        match provider.measure(element) {
            Some(rect) => {
                self.links
                    .register_snapshot(tag, screen, rect, styles, ancestors);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::MeasuredRect;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn lifecycle() -> ScreenLifecycle {
        let states = Arc::new(ScreenStateStore::new());
        let scheduler = Arc::new(Mutex::new(TransitionScheduler::new(states)));
        ScreenLifecycle::new(Arc::new(BoundLinkStore::new()), scheduler)
    }

    #[test]
    fn test_unknown_screen_removal_is_rejected() {
        let lifecycle = lifecycle();
        let result = lifecycle.request_removal("ghost", None, Box::new(|| {}));
        assert!(matches!(result, Err(SegueError::UnknownScreen(_))));
    }

    #[test]
    fn test_instant_mount_and_removal() {
        let lifecycle = lifecycle();
        lifecycle.screen_mounted("a", Some("Detail"), None, None);

        let state = lifecycle.states().get("a").unwrap();
        assert_eq!(state.progress, 1.0);
        assert!(!state.entering, "instant open clears entering synchronously");
        assert_eq!(state.route.as_deref(), Some("Detail"));

        let removed = Arc::new(AtomicUsize::new(0));
        let removed_inner = removed.clone();
        let decision = lifecycle
            .request_removal(
                "a",
                None,
                Box::new(move || {
                    removed_inner.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert_eq!(decision, RemovalDecision::Immediate);
        assert_eq!(removed.load(Ordering::SeqCst), 1);
        assert_eq!(lifecycle.states().get("a").unwrap().progress, 0.0);

        lifecycle.finalize_removal("a");
        assert!(!lifecycle.states().contains("a"));
    }

    struct FixedProvider(Option<MeasuredRect>);

    impl MeasurementProvider for FixedProvider {
        fn measure(&self, _element: ElementHandle) -> Option<MeasuredRect> {
            self.0
        }
    }

    #[test]
    fn test_capture_snapshot_waits_for_measurability() {
        let lifecycle = lifecycle();

        let unmeasurable = FixedProvider(None);
        assert!(!lifecycle.capture_snapshot(
            "hero",
            "a",
            7,
            &unmeasurable,
            StyleSnapshot::default(),
            &[],
        ));

        let measurable = FixedProvider(Some(MeasuredRect::from_origin_size(0.0, 0.0, 10.0, 10.0)));
        assert!(lifecycle.capture_snapshot(
            "hero",
            "a",
            7,
            &measurable,
            StyleSnapshot::default(),
            &[],
        ));
        assert_eq!(lifecycle.links().tag_count(), 1);
    }
}
