//! Screen animation pipeline
//!
//! Composes the two stores plus external layout/insets into one
//! frame-coherent snapshot, and exposes a bounds accessor bound to that
//! snapshot. Style-computation callbacks consume both; whatever they
//! return is keyed by element tag (or the reserved whole-screen slots).
//!
//! Within one frame, every read comes from the same published state:
//! `previous`/`current`/`next` are taken from a single load of the state
//! registry, so an element's transform is never computed from
//! half-updated cross-screen state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

use segue_core::{EdgeInsets, ScreenLayout};
use segue_geometry::ElementStyle;
use segue_store::{BoundLinkStore, ResolveContext, ResolvedPair};

use crate::state::{ScreenStateStore, ScreenTransitionState};

/// Reserved style-map key for the whole screen content
pub const CONTENT_SLOT: &str = "__content__";

/// Reserved style-map key for the backdrop behind the screen
pub const BACKDROP_SLOT: &str = "__backdrop__";

/// Per-frame styles keyed by element tag or a reserved slot
pub type StyleMap = FxHashMap<String, ElementStyle>;

/// External inputs for one frame of one screen
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub current: &'a str,
    pub previous: Option<&'a str>,
    pub next: Option<&'a str>,
    pub layout: ScreenLayout,
    pub insets: EdgeInsets,
}

/// Frame-coherent view of a screen and its neighbors
#[derive(Clone, Debug)]
pub struct PipelineSnapshot {
    pub previous: Option<ScreenTransitionState>,
    pub current: ScreenTransitionState,
    pub next: Option<ScreenTransitionState>,
    /// Combined progress: the screen's own `[0, 1]` plus the screen
    /// above it, covering the `[0, 2]` interpolation range
    pub progress: f32,
    /// No screen above: this one has focus
    pub focused: bool,
    /// Any participating screen still moving
    pub active: bool,
    pub layout: ScreenLayout,
    pub insets: EdgeInsets,
}

/// Everything a style callback gets to see for one frame
pub struct StyleFrame<'a> {
    pub snapshot: &'a PipelineSnapshot,
    bounds: &'a dyn Fn(&str) -> Option<ResolvedPair>,
}

impl StyleFrame<'_> {
    /// Resolved source/destination bounds for a tag, or `None` when the
    /// tag yields no style this frame
    pub fn bounds(&self, tag: &str) -> Option<ResolvedPair> {
        (self.bounds)(tag)
    }
}

/// Composes stores and external layout into per-frame style inputs
pub struct ScreenAnimationPipeline {
    links: Arc<BoundLinkStore>,
    states: Arc<ScreenStateStore>,
}

impl ScreenAnimationPipeline {
    pub fn new(links: Arc<BoundLinkStore>, states: Arc<ScreenStateStore>) -> Self {
        Self { links, states }
    }

    /// Take one frame-coherent snapshot of the screen and its neighbors
    pub fn snapshot(&self, input: &FrameInput) -> PipelineSnapshot {
        let map = self.states.load();

        let current = map
            .get(input.current)
            .cloned()
            .unwrap_or_else(|| ScreenTransitionState::new(input.current));
        // Neighbors keep their keys even before their first state write;
        // a missing entry reads as a closed screen.
        let previous = input
            .previous
            .map(|k| map.get(k).cloned().unwrap_or_else(|| ScreenTransitionState::new(k)));
        let next = input
            .next
            .map(|k| map.get(k).cloned().unwrap_or_else(|| ScreenTransitionState::new(k)));

        let progress = current.progress + next.as_ref().map_or(0.0, |n| n.progress);
        let focused = next.is_none();
        let active = !current.settled()
            || previous.as_ref().is_some_and(|s| !s.settled())
            || next.as_ref().is_some_and(|s| !s.settled());

        PipelineSnapshot {
            previous,
            current,
            next,
            progress,
            focused,
            active,
            layout: input.layout,
            insets: input.insets,
        }
    }

    /// Resolve a tag's transition pair against a snapshot's keys
    pub fn resolve_bounds(
        &self,
        snapshot: &PipelineSnapshot,
        tag: &str,
    ) -> Option<ResolvedPair> {
        let ctx = ResolveContext {
            current: snapshot.current.key.clone(),
            previous: snapshot.previous.as_ref().map(|s| s.key.clone()),
            next: snapshot.next.as_ref().map(|s| s.key.clone()),
            entering: snapshot.current.entering && !snapshot.current.closing,
        };
        self.links.resolve_transition_pair(tag, &ctx)
    }

    /// A bounds accessor bound to one snapshot, for style callbacks
    pub fn bounds_accessor<'a>(
        &'a self,
        snapshot: &'a PipelineSnapshot,
    ) -> impl Fn(&str) -> Option<ResolvedPair> + 'a {
        move |tag| self.resolve_bounds(snapshot, tag)
    }

    /// Run a style callback against one frame.
    ///
    /// A callback that panics degrades to an empty style map for this
    /// frame (with a dev-only warning); the animation scheduler loop is
    /// never allowed to crash on a misbehaving interpolator.
    pub fn compute_styles<F>(&self, snapshot: &PipelineSnapshot, callback: F) -> StyleMap
    where
        F: FnOnce(&StyleFrame) -> StyleMap,
    {
        let bounds = self.bounds_accessor(snapshot);
        let frame = StyleFrame {
            snapshot,
            bounds: &bounds,
        };

        match catch_unwind(AssertUnwindSafe(|| callback(&frame))) {
            Ok(styles) => styles,
            Err(_) => {
                if cfg!(debug_assertions) {
                    warn!(
                        screen = %snapshot.current.key,
                        "style callback panicked, emitting neutral styles for this frame"
                    );
                }
                StyleMap::default()
            }
        }
    }
}
