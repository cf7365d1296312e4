//! Per-screen transition state
//!
//! One process-wide registry of `ScreenTransitionState`, keyed by screen
//! identity and free of any one screen's lifecycle: entries are created
//! lazily on first reference and removed only by the explicit
//! screen-removed signal - the animating element may already be unmounted
//! while its closing transition is still in flight.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use segue_core::{ScreenKey, StateCell};

// ============================================================================
// Dismiss directions
// ============================================================================

/// A single dismissal direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissDirection {
    Right,
    Left,
    Down,
    Up,
}

impl DismissDirection {
    pub const ALL: [DismissDirection; 4] = [
        DismissDirection::Right,
        DismissDirection::Left,
        DismissDirection::Down,
        DismissDirection::Up,
    ];

    /// `true` for horizontal directions
    pub fn is_horizontal(&self) -> bool {
        matches!(self, DismissDirection::Right | DismissDirection::Left)
    }

    /// Sign of the translation along the axis (+1 right/down, -1 left/up)
    pub fn sign(&self) -> f32 {
        match self {
            DismissDirection::Right | DismissDirection::Down => 1.0,
            DismissDirection::Left | DismissDirection::Up => -1.0,
        }
    }
}

/// Set of permitted dismissal directions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DismissDirections {
    bits: u8,
}

impl DismissDirections {
    pub const NONE: DismissDirections = DismissDirections { bits: 0 };
    const RIGHT: u8 = 0b0001;
    const LEFT: u8 = 0b0010;
    const DOWN: u8 = 0b0100;
    const UP: u8 = 0b1000;

    /// The common "swipe from the leading edge to go back" setting
    pub fn horizontal() -> Self {
        Self {
            bits: Self::RIGHT | Self::LEFT,
        }
    }

    /// Sheet-style "drag down to dismiss"
    pub fn vertical() -> Self {
        Self {
            bits: Self::DOWN | Self::UP,
        }
    }

    pub fn all() -> Self {
        Self { bits: 0b1111 }
    }

    pub fn with(mut self, direction: DismissDirection) -> Self {
        self.bits |= Self::bit(direction);
        self
    }

    pub fn contains(&self, direction: DismissDirection) -> bool {
        self.bits & Self::bit(direction) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    fn bit(direction: DismissDirection) -> u8 {
        match direction {
            DismissDirection::Right => Self::RIGHT,
            DismissDirection::Left => Self::LEFT,
            DismissDirection::Down => Self::DOWN,
            DismissDirection::Up => Self::UP,
        }
    }
}

// ============================================================================
// Screen state
// ============================================================================

/// Live gesture vector for a screen.
///
/// `x`/`y` are raw translations in pixels; `norm_x`/`norm_y` are
/// normalized against the screen dimensions into `[-1, 1]`. Only the
/// active pan recognizer for a screen writes these fields.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureVector {
    pub x: f32,
    pub y: f32,
    pub norm_x: f32,
    pub norm_y: f32,
    pub dragging: bool,
    pub dismissing: bool,
    pub direction: Option<DismissDirection>,
}

/// Per-screen progress and lifecycle flags
#[derive(Clone, Debug)]
pub struct ScreenTransitionState {
    pub key: ScreenKey,
    /// Route identity supplied by the host navigation model
    pub route: Option<String>,
    /// Opaque host metadata carried alongside the screen
    pub metadata: Option<serde_json::Value>,
    /// `[0, 1]`: 0 closed, 1 fully open
    pub progress: f32,
    pub closing: bool,
    pub entering: bool,
    pub animating: bool,
    pub gesture: GestureVector,
}

impl ScreenTransitionState {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            route: None,
            metadata: None,
            progress: 0.0,
            closing: false,
            entering: false,
            animating: false,
            gesture: GestureVector::default(),
        }
    }

    /// Neither animating, being dragged, dismissing, nor closing
    pub fn settled(&self) -> bool {
        !(self.gesture.dragging || self.animating || self.gesture.dismissing || self.closing)
    }
}

/// Registry of per-screen transition state
#[derive(Default)]
pub struct ScreenStateStore {
    cell: StateCell<FxHashMap<ScreenKey, ScreenTransitionState>>,
}

impl ScreenStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full map at one instant, for frame-coherent multi-screen reads
    pub fn load(&self) -> Arc<FxHashMap<ScreenKey, ScreenTransitionState>> {
        self.cell.load()
    }

    pub fn get(&self, key: &str) -> Option<ScreenTransitionState> {
        self.cell.load().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cell.load().contains_key(key)
    }

    /// Read the screen's state, creating it on first reference
    pub fn ensure(&self, key: &str) -> ScreenTransitionState {
        if let Some(state) = self.get(key) {
            return state;
        }
        self.modify(key, |_| {});
        self.get(key)
            .unwrap_or_else(|| ScreenTransitionState::new(key))
    }

    /// Mutate the screen's state (created lazily), publishing a whole new
    /// registry snapshot
    pub fn modify(&self, key: &str, f: impl FnOnce(&mut ScreenTransitionState)) {
        self.cell.update(|map| {
            let mut next = map.clone();
            let state = next
                .entry(key.to_string())
                .or_insert_with(|| ScreenTransitionState::new(key));
            f(state);
            next
        });
    }

    /// Drop the screen's state. The explicit teardown path; nothing else
    /// removes entries.
    pub fn remove(&self, key: &str) {
        self.cell.update(|map| {
            let mut next = map.clone();
            next.remove(key);
            next
        });
    }

    pub fn len(&self) -> usize {
        self.cell.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.load().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_requires_all_flags_clear() {
        let mut state = ScreenTransitionState::new("a");
        assert!(state.settled());
        state.animating = true;
        assert!(!state.settled());
        state.animating = false;
        state.gesture.dismissing = true;
        assert!(!state.settled());
        state.gesture.dismissing = false;
        state.closing = true;
        assert!(!state.settled());
    }

    #[test]
    fn test_store_lazy_create_and_remove() {
        let store = ScreenStateStore::new();
        assert!(!store.contains("a"));
        let state = store.ensure("a");
        assert_eq!(state.progress, 0.0);
        assert!(store.contains("a"));

        store.modify("a", |s| s.progress = 1.0);
        assert_eq!(store.get("a").unwrap().progress, 1.0);

        store.remove("a");
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_load_is_frame_coherent() {
        let store = ScreenStateStore::new();
        store.modify("a", |s| s.progress = 0.25);
        let snapshot = store.load();
        store.modify("a", |s| s.progress = 0.75);
        // The earlier snapshot still reads the values it was taken with.
        assert_eq!(snapshot["a"].progress, 0.25);
    }

    #[test]
    fn test_direction_set() {
        let set = DismissDirections::horizontal();
        assert!(set.contains(DismissDirection::Right));
        assert!(set.contains(DismissDirection::Left));
        assert!(!set.contains(DismissDirection::Down));

        let set = DismissDirections::NONE.with(DismissDirection::Up);
        assert!(set.contains(DismissDirection::Up));
        assert!(!set.is_empty());
        assert!(DismissDirections::NONE.is_empty());
    }
}
