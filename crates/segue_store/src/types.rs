//! Store data types

use segue_core::{key_matches, AncestorChain, MeasuredRect, ScreenKey, StyleSnapshot};
use segue_geometry::{Anchor, ScaleMode};
use serde::{Deserialize, Serialize};

/// An absolute-rect + style capture of an element at one screen,
/// independent of any specific transition.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub screen: ScreenKey,
    pub bounds: MeasuredRect,
    pub styles: StyleSnapshot,
    /// Ancestor navigator keys, so a nested screen's element stays
    /// matchable by an enclosing screen's key
    pub ancestors: AncestorChain,
}

impl Snapshot {
    /// Whether `key` identifies this snapshot's screen, directly or via
    /// the ancestor chain
    pub fn matches(&self, key: &str) -> bool {
        key_matches(key, &self.screen, &self.ancestors)
    }

    /// Whether this snapshot and the given screen identity describe the
    /// same screen (either side may be the ancestor)
    pub(crate) fn same_screen(&self, screen: &str, ancestors: &[ScreenKey]) -> bool {
        self.matches(screen) || key_matches(&self.screen, screen, ancestors)
    }
}

/// One concrete transition intent for a tag.
///
/// A link with `destination == None` is *pending*: the source element has
/// declared itself the transition's origin, but the paired screen's
/// element has not measured yet.
#[derive(Clone, Debug)]
pub struct TagLink {
    pub source: Snapshot,
    pub destination: Option<Snapshot>,
}

impl TagLink {
    pub fn is_pending(&self) -> bool {
        self.destination.is_none()
    }
}

/// What a boundary's computed style applies to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundTarget {
    /// The tagged element itself
    #[default]
    Element,
    /// The whole screen content ("zoom into element" presets)
    Content,
}

/// How the two ends of a match are visually reconciled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundMethod {
    /// Translate/scale the element between the two rects
    #[default]
    Transform,
    /// Animate width/height (layout-affecting resize)
    Size,
}

/// Default geometry policy a screen declares for a tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub anchor: Anchor,
    pub scale_mode: ScaleMode,
    pub target: BoundTarget,
    pub method: BoundMethod,
}

/// Refcounted "live element" marker per `(tag, screen)`.
///
/// Distinct from a [`Snapshot`] (which may outlive unmount) and from a
/// [`TagLink`] (which represents one specific transition).
#[derive(Clone, Debug)]
pub(crate) struct PresenceEntry {
    pub count: u32,
    pub config: BoundaryConfig,
}

/// Navigation context a pair is resolved against
#[derive(Clone, Debug, Default)]
pub struct ResolveContext {
    /// Screen whose style callback is asking
    pub current: ScreenKey,
    /// Screen below it in the stack, if any
    pub previous: Option<ScreenKey>,
    /// Screen above it in the stack, if any
    pub next: Option<ScreenKey>,
    /// `true` while the current screen is becoming focused; `false`
    /// while it is being dismissed
    pub entering: bool,
}

/// A resolved source/destination pair for one tag at one frame
#[derive(Clone, Debug)]
pub struct ResolvedPair {
    pub source_bounds: MeasuredRect,
    pub dest_bounds: MeasuredRect,
    pub source_styles: StyleSnapshot,
    pub dest_styles: StyleSnapshot,
    pub source_key: ScreenKey,
    pub dest_key: ScreenKey,
    /// The source came from a link whose destination has not measured yet
    pub used_pending: bool,
    /// The source side fell back to a recorded snapshot
    pub used_snapshot_source: bool,
    /// The destination side fell back to a recorded snapshot
    pub used_snapshot_dest: bool,
}

impl ResolvedPair {
    pub(crate) fn from_ends(source: &Snapshot, dest: &Snapshot) -> Self {
        Self {
            source_bounds: source.bounds,
            dest_bounds: dest.bounds,
            source_styles: source.styles,
            dest_styles: dest.styles,
            source_key: source.screen.clone(),
            dest_key: dest.screen.clone(),
            used_pending: false,
            used_snapshot_source: false,
            used_snapshot_dest: false,
        }
    }
}
