//! Segue Core Primitives
//!
//! This crate provides the foundational types shared by the Segue
//! transition engine:
//!
//! - **Measured rects**: absolute window-space layout snapshots
//! - **Keys**: screen/tag identity and ancestor-chain matching
//! - **Value cells**: replace-on-write snapshot state for cross-context reads
//! - **Collaborator traits**: measurement and frame-clock seams
//!
//! # Example
//!
//! ```rust
//! use segue_core::{MeasuredRect, StateCell};
//!
//! let cell = StateCell::new(vec![1, 2, 3]);
//!
//! // Readers get an immutable snapshot; writers publish a whole new value.
//! let before = cell.load();
//! cell.update(|v| {
//!     let mut next = v.clone();
//!     next.push(4);
//!     next
//! });
//!
//! assert_eq!(before.len(), 3);
//! assert_eq!(cell.load().len(), 4);
//!
//! let rect = MeasuredRect::from_origin_size(10.0, 20.0, 100.0, 50.0);
//! assert_eq!(rect.page_center(), (60.0, 45.0));
//! ```

pub mod cell;
pub mod error;
pub mod keys;
pub mod provider;
pub mod rect;
pub mod style;

pub use cell::StateCell;
pub use error::SegueError;
pub use keys::{group_tag, key_matches, AncestorChain, GroupName, ScreenKey, Tag};
pub use provider::{ElementHandle, FrameClock, MeasurementProvider, StdClock};
pub use rect::{nonzero_denom, EdgeInsets, MeasuredRect, ScreenLayout};
pub use style::StyleSnapshot;
