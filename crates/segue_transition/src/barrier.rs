//! Multi-value completion barrier
//!
//! When several animated values must all reach "finished" before one
//! follow-up action runs (resetting four gesture axes before clearing the
//! direction flag), each animation's finish callback decrements a shared
//! countdown and the follow-up fires only when it reaches zero. Any
//! `finished = false` report aborts the barrier: the follow-up never runs,
//! because a superseded member means a newer transition owns the state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::FinishCallback;

type Action = Box<dyn FnOnce() + Send>;

struct BarrierInner {
    remaining: Mutex<usize>,
    aborted: AtomicBool,
    action: Mutex<Option<Action>>,
}

/// Countdown barrier over N finish callbacks
pub struct FinishBarrier {
    inner: Arc<BarrierInner>,
}

impl FinishBarrier {
    /// Create a barrier expecting `count` completions.
    ///
    /// With zero items the action runs immediately, synchronously - the
    /// degenerate case must satisfy the same contract as the animated one.
    pub fn new(count: usize, action: impl FnOnce() + Send + 'static) -> Self {
        if count == 0 {
            action();
            return Self {
                inner: Arc::new(BarrierInner {
                    remaining: Mutex::new(0),
                    aborted: AtomicBool::new(false),
                    action: Mutex::new(None),
                }),
            };
        }

        Self {
            inner: Arc::new(BarrierInner {
                remaining: Mutex::new(count),
                aborted: AtomicBool::new(false),
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// A finish callback for one member. Call exactly `count` times total.
    pub fn callback(&self) -> FinishCallback {
        let inner = Arc::clone(&self.inner);
        Box::new(move |finished| {
            if !finished {
                inner.aborted.store(true, Ordering::SeqCst);
                return;
            }

            let ready = {
                let mut remaining = inner.remaining.lock().unwrap();
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            };

            if ready && !inner.aborted.load(Ordering::SeqCst) {
                if let Some(action) = inner.action.lock().unwrap().take() {
                    action();
                }
            }
        })
    }
}
