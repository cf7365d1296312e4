//! Error types for control-context entry points
//!
//! Frame-path code never errors - unresolved matches and malformed
//! geometry degrade to neutral values. Only discrete control operations
//! (mount/removal requests) can reject their input.

use thiserror::Error;

use crate::keys::ScreenKey;

#[derive(Debug, Error)]
pub enum SegueError {
    /// A control operation referenced a screen the state store has never
    /// seen (or that was already torn down).
    #[error("unknown screen key `{0}`")]
    UnknownScreen(ScreenKey),

    /// A transition was requested with nothing to animate.
    #[error("transition has no screens to animate")]
    EmptyTransition,
}
