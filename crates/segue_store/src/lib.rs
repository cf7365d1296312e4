//! Segue Bound Link Store
//!
//! The concurrent registry that pairs "source" and "destination" element
//! measurements across two screens, despite asynchronous mount/measure
//! ordering, ancestor nesting, and many-to-one tag reuse:
//!
//! - **Snapshots**: per `(tag, screen)` rect + style captures that outlive
//!   unmount
//! - **Link stacks**: ordered transition intents per tag, with pending
//!   destinations completed as the paired screen measures
//! - **Boundary presence**: refcounted "this screen has a live element for
//!   this tag" plus its declared geometry policy
//! - **Groups**: list/collection tag families with one active member
//!
//! The store is a dependency-injected object (no module-level singleton)
//! whose whole state lives in one replace-on-write cell, so frame-rate
//! readers always see a coherent registry. Matching is idempotent and
//! cheap; callers re-run [`BoundLinkStore::resolve_transition_pair`] every
//! frame instead of caching across mutations.

pub mod registry;
pub mod types;

pub use registry::BoundLinkStore;
pub use types::{
    BoundMethod, BoundTarget, BoundaryConfig, ResolveContext, ResolvedPair, Snapshot, TagLink,
};
