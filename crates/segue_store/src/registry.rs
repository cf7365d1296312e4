//! The bound link store
//!
//! All registry state lives in a single [`RegistryState`] value inside a
//! replace-on-write cell: every mutation publishes a whole new registry,
//! every reader works from one coherent snapshot. The store itself is
//! cheap to share (`Arc<BoundLinkStore>`) and carries no screen's
//! lifecycle - entries are removed only by the explicit
//! [`BoundLinkStore::clear`] teardown signal, never by UI garbage
//! collection, because an animating element may already be unmounted
//! while its closing transition is still in flight.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use segue_core::{
    group_tag, AncestorChain, GroupName, MeasuredRect, ScreenKey, StateCell, StyleSnapshot, Tag,
};

use crate::types::{
    BoundaryConfig, PresenceEntry, ResolveContext, ResolvedPair, Snapshot, TagLink,
};

/// Per-tag registry entry: recorded snapshots (latest per screen, oldest
/// first) plus the ordered link stack (most recent intent last).
#[derive(Clone, Debug, Default)]
struct TagEntry {
    snapshots: Vec<Snapshot>,
    links: SmallVec<[TagLink; 2]>,
}

impl TagEntry {
    fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.links.is_empty()
    }
}

/// Whole registry state, replaced wholesale on every mutation
#[derive(Clone, Debug, Default)]
struct RegistryState {
    tags: FxHashMap<Tag, TagEntry>,
    presence: FxHashMap<Tag, FxHashMap<ScreenKey, PresenceEntry>>,
    groups: FxHashMap<GroupName, String>,
}

/// The shared-element registry
#[derive(Default)]
pub struct BoundLinkStore {
    state: StateCell<RegistryState>,
}

impl BoundLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Record (or replace) the snapshot for `(tag, screen)`
    pub fn register_snapshot(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
    ) {
        trace!(tag, screen, "register snapshot");
        let snapshot = make_snapshot(screen, bounds, styles, ancestors);
        self.state.update(|state| {
            let mut next = state.clone();
            let entry = next.tags.entry(tag.to_string()).or_default();
            entry.snapshots.retain(|s| s.screen != screen);
            entry.snapshots.push(snapshot.clone());
            next
        });
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Push a new transition intent with `screen` as its origin.
    ///
    /// Spam safety: if the top-of-stack link is still pending and its
    /// recorded source matches the incoming screen (directly or via
    /// ancestor chain), the link is updated in place instead - repeated
    /// re-renders of the same source before its destination ever measures
    /// must not grow the stack.
    pub fn set_link_source(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
    ) {
        let snapshot = make_snapshot(screen, bounds, styles, ancestors);
        self.state.update(|state| {
            let mut next = state.clone();
            let entry = next.tags.entry(tag.to_string()).or_default();

            if let Some(top) = entry.links.last_mut() {
                if top.is_pending() && top.source.same_screen(screen, &snapshot.ancestors) {
                    trace!(tag, screen, "update pending link source in place");
                    top.source = snapshot.clone();
                    return next;
                }
            }

            debug!(tag, screen, depth = entry.links.len() + 1, "push link source");
            entry.links.push(TagLink {
                source: snapshot.clone(),
                destination: None,
            });
            next
        });
    }

    /// Complete a pending link with `screen` as its destination.
    ///
    /// When `expected_source` is given, the most recent pending link from
    /// that source is preferred; otherwise the most recent pending link
    /// wins. With no pending link at all, the measurement is recorded as a
    /// plain snapshot so it still participates in fallback matching.
    pub fn set_link_destination(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
        expected_source: Option<&str>,
    ) {
        let snapshot = make_snapshot(screen, bounds, styles, ancestors);
        self.state.update(|state| {
            let mut next = state.clone();
            let entry = next.tags.entry(tag.to_string()).or_default();

            let index = expected_source
                .and_then(|expected| {
                    entry
                        .links
                        .iter()
                        .rposition(|l| l.is_pending() && l.source.matches(expected))
                })
                .or_else(|| entry.links.iter().rposition(|l| l.is_pending()));

            match index {
                Some(i) => {
                    debug!(tag, screen, source = %entry.links[i].source.screen, "complete link");
                    entry.links[i].destination = Some(snapshot.clone());
                }
                None => {
                    debug!(tag, screen, "destination with no pending link, keeping snapshot");
                    entry.snapshots.retain(|s| s.screen != screen);
                    entry.snapshots.push(snapshot.clone());
                }
            }
            next
        });
    }

    /// Rewrite the most recent link source for `screen` in place (used
    /// when an element re-measures after its first report). Returns
    /// whether a link was found.
    pub fn update_link_source(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
    ) -> bool {
        self.rewrite_link_end(tag, screen, bounds, styles, ancestors, LinkEnd::Source)
    }

    /// Rewrite the most recent link destination for `screen` in place.
    /// Returns whether a link was found.
    pub fn update_link_destination(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
    ) -> bool {
        self.rewrite_link_end(tag, screen, bounds, styles, ancestors, LinkEnd::Destination)
    }

    fn rewrite_link_end(
        &self,
        tag: &str,
        screen: &str,
        bounds: MeasuredRect,
        styles: StyleSnapshot,
        ancestors: &[ScreenKey],
        end: LinkEnd,
    ) -> bool {
        let snapshot = make_snapshot(screen, bounds, styles, ancestors);
        let mut rewritten = false;
        self.state.update(|state| {
            let mut next = state.clone();
            if let Some(entry) = next.tags.get_mut(tag) {
                let index = entry.links.iter().rposition(|l| match end {
                    LinkEnd::Source => l.source.matches(screen),
                    LinkEnd::Destination => {
                        l.destination.as_ref().is_some_and(|d| d.matches(screen))
                    }
                });
                if let Some(i) = index {
                    match end {
                        LinkEnd::Source => entry.links[i].source = snapshot.clone(),
                        LinkEnd::Destination => entry.links[i].destination = Some(snapshot.clone()),
                    }
                    rewritten = true;
                }
            }
            next
        });
        if !rewritten {
            trace!(tag, screen, "no link end to rewrite");
        }
        rewritten
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the source/destination pair for one tag at one frame.
    ///
    /// Tried in order, stopping at the first hit:
    ///
    /// 1. a completed link whose destination matches the relevant screen
    ///    keys (direction-ordered, ancestor chains included);
    /// 2. a pending link already in flight from the far screen (its
    ///    destination falls back to a recorded snapshot);
    /// 3. a completed link that *originated* on the far screen - the
    ///    symmetric, closing-back-to-where-we-came-from case, where the
    ///    destination was recorded under a key step 1 cannot see;
    /// 4. recorded snapshots in the same direction-dependent order.
    ///
    /// Pairs are always link-oriented: `source` is the transition's
    /// origin side, `dest` the side it lands on when opening; composers
    /// mirror for the closing direction. Ambiguity (several plausible
    /// links) is an expected steady state during rapid navigation and
    /// resolves to the most recent intent; a tag with no resolvable pair
    /// yields `None` and the caller emits no style for this frame.
    pub fn resolve_transition_pair(&self, tag: &str, ctx: &ResolveContext) -> Option<ResolvedPair> {
        let state = self.state.load();
        let entry = state.tags.get(tag)?;
        let other = ctx.previous.as_deref();
        let candidates = candidate_keys(ctx);

        // 1. completed link landing on a relevant screen, most recent first
        for link in entry.links.iter().rev() {
            if let Some(dest) = &link.destination {
                if candidates.iter().any(|key| dest.matches(key)) {
                    return Some(ResolvedPair::from_ends(&link.source, dest));
                }
            }
        }

        // 2. pending link in flight from the far screen
        if let Some(other) = other {
            for link in entry.links.iter().rev() {
                if link.is_pending() && link.source.matches(other) {
                    if let Some(dest) = latest_snapshot(entry, &candidates, |s| {
                        s.screen != link.source.screen
                    }) {
                        let mut pair = ResolvedPair::from_ends(&link.source, dest);
                        pair.used_pending = true;
                        pair.used_snapshot_dest = true;
                        return Some(pair);
                    }
                }
            }

            // 3. completed link originating on the far screen
            for link in entry.links.iter().rev() {
                if let Some(dest) = &link.destination {
                    if link.source.matches(other) {
                        return Some(ResolvedPair::from_ends(&link.source, dest));
                    }
                }
            }
        }

        // 4. snapshot fallback, destination first
        let dest = latest_snapshot(entry, &candidates, |_| true)?;
        let mut source_order: SmallVec<[&str; 4]> = SmallVec::new();
        if let Some(other) = other {
            source_order.push(other);
        }
        source_order.extend(candidates.iter().copied());
        let source = latest_snapshot(entry, &source_order, |s| s.screen != dest.screen)?;

        let mut pair = ResolvedPair::from_ends(source, dest);
        pair.used_snapshot_source = true;
        pair.used_snapshot_dest = true;
        Some(pair)
    }

    // ========================================================================
    // Boundary presence
    // ========================================================================

    /// Mark a live element for `(tag, screen)`, declaring its default
    /// geometry policy. Multiple mounted instances (remounts) stack.
    pub fn register_boundary_presence(&self, tag: &str, screen: &str, config: BoundaryConfig) {
        self.state.update(|state| {
            let mut next = state.clone();
            let entry = next
                .presence
                .entry(tag.to_string())
                .or_default()
                .entry(screen.to_string())
                .or_insert(PresenceEntry { count: 0, config });
            entry.count += 1;
            entry.config = config;
            next
        });
    }

    /// Drop one live-element reference. Returns the remaining count.
    pub fn unregister_boundary_presence(&self, tag: &str, screen: &str) -> u32 {
        let mut remaining = 0;
        self.state.update(|state| {
            let mut next = state.clone();
            if let Some(screens) = next.presence.get_mut(tag) {
                if let Some(entry) = screens.get_mut(screen) {
                    entry.count = entry.count.saturating_sub(1);
                    remaining = entry.count;
                    if entry.count == 0 {
                        screens.remove(screen);
                    }
                }
                if screens.is_empty() {
                    next.presence.remove(tag);
                }
            }
            next
        });
        remaining
    }

    /// Whether `screen` currently has a live element for `tag`
    pub fn has_boundary_presence(&self, tag: &str, screen: &str) -> bool {
        self.state
            .load()
            .presence
            .get(tag)
            .and_then(|screens| screens.get(screen))
            .is_some_and(|entry| entry.count > 0)
    }

    /// The geometry policy `screen` declared for `tag`
    pub fn boundary_config(&self, tag: &str, screen: &str) -> Option<BoundaryConfig> {
        self.state
            .load()
            .presence
            .get(tag)
            .and_then(|screens| screens.get(screen))
            .map(|entry| entry.config)
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// The currently active member id of a group
    pub fn group_active_id(&self, group: &str) -> Option<String> {
        self.state.load().groups.get(group).cloned()
    }

    pub fn set_group_active_id(&self, group: &str, id: &str) {
        self.state.update(|state| {
            let mut next = state.clone();
            next.groups.insert(group.to_string(), id.to_string());
            next
        });
    }

    /// Resolve the concrete tag for an element.
    ///
    /// Without a group the tag is `id` verbatim. With a group, the
    /// group's active id is eagerly updated whenever a different id is
    /// requested, and the composite `group:id` tag is returned - a list
    /// screen registers N members under one group while only the
    /// currently active one participates in any given transition.
    pub fn resolve_bound_tag(&self, id: &str, group: Option<&str>) -> Tag {
        match group {
            None => id.to_string(),
            Some(group) => {
                self.state.update(|state| {
                    if state.groups.get(group).map(String::as_str) == Some(id) {
                        return state.clone();
                    }
                    trace!(group, id, "group active id changed");
                    let mut next = state.clone();
                    next.groups.insert(group.to_string(), id.to_string());
                    next
                });
                group_tag(group, id)
            }
        }
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Remove every snapshot, link (either side), and presence entry
    /// referencing `screen`, directly or via ancestor chains - atomically,
    /// leaving all other screens' entries untouched. This is the only
    /// deletion path; it runs once a screen's removal is finalized.
    pub fn clear(&self, screen: &str) {
        debug!(screen, "clear screen");
        self.state.update(|state| {
            let mut next = state.clone();

            next.tags.retain(|_, entry| {
                entry.snapshots.retain(|s| !s.matches(screen));
                entry.links.retain(|l| {
                    !l.source.matches(screen)
                        && !l.destination.as_ref().is_some_and(|d| d.matches(screen))
                });
                !entry.is_empty()
            });

            next.presence.retain(|_, screens| {
                screens.retain(|key, _| key != screen);
                !screens.is_empty()
            });

            next
        });
    }

    /// Number of tags with any recorded state (diagnostics)
    pub fn tag_count(&self) -> usize {
        self.state.load().tags.len()
    }
}

enum LinkEnd {
    Source,
    Destination,
}

fn make_snapshot(
    screen: &str,
    bounds: MeasuredRect,
    styles: StyleSnapshot,
    ancestors: &[ScreenKey],
) -> Snapshot {
    Snapshot {
        screen: screen.to_string(),
        bounds,
        styles,
        ancestors: AncestorChain::from_iter(ancestors.iter().cloned()),
    }
}

/// Candidate screen keys for snapshot fallback, highest priority first
fn candidate_keys(ctx: &ResolveContext) -> SmallVec<[&str; 3]> {
    let mut keys: SmallVec<[&str; 3]> = SmallVec::new();
    if ctx.entering {
        keys.push(ctx.current.as_str());
        keys.extend(ctx.previous.as_deref());
        keys.extend(ctx.next.as_deref());
    } else {
        keys.extend(ctx.next.as_deref());
        keys.extend(ctx.previous.as_deref());
        keys.push(ctx.current.as_str());
    }
    keys
}

/// Most recent snapshot matching the candidate keys in priority order
fn latest_snapshot<'a>(
    entry: &'a TagEntry,
    keys: &[&str],
    accept: impl Fn(&Snapshot) -> bool,
) -> Option<&'a Snapshot> {
    for key in keys {
        if let Some(found) = entry
            .snapshots
            .iter()
            .rev()
            .find(|s| s.matches(key) && accept(s))
        {
            return Some(found);
        }
    }
    None
}
