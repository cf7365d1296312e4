//! Replace-on-write value cells
//!
//! Cross-context state (registries, per-screen transition state) is held in
//! `StateCell`s: a write publishes a whole new snapshot behind an `Arc`
//! rather than mutating shared structures in place, so a reader on the
//! animation context never observes a torn intermediate state. The internal
//! lock is held only for the pointer swap, never across user code.

use std::sync::{Arc, Mutex};

/// A cell holding an immutable snapshot that is replaced wholesale on write
pub struct StateCell<T> {
    slot: Mutex<Arc<T>>,
}

impl<T> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(Arc::new(value)),
        }
    }

    /// Get the current snapshot. The returned `Arc` stays valid even if a
    /// writer publishes a newer snapshot while the caller is still reading.
    pub fn load(&self) -> Arc<T> {
        self.slot.lock().unwrap().clone()
    }

    /// Publish a new snapshot, replacing the current one
    pub fn store(&self, value: T) {
        *self.slot.lock().unwrap() = Arc::new(value);
    }

    /// Derive and publish a new snapshot from the current one.
    ///
    /// The closure runs outside the lock; concurrent updates are resolved
    /// last-writer-wins, which is sufficient under the single-writer
    /// convention each cell is used with.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.load();
        let next = f(&current);
        self.store(next);
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
