//! "Create exactly once, share the result" keyed by canonical path (spec.md
//! §4.2 "Singleton-initialization map", §9 "Singleton initialization under
//! contention").
//!
//! The latch is set even when the init function fails, so concurrent
//! waiters never deadlock on a key whose build errored out. Completed
//! results live in a separate permanent cache so the latch itself — just a
//! mutex/condvar pair — can be handed back to a free-list and reused by the
//! next unseen key instead of being allocated fresh each time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use classgraph_scanspec::InterruptFlag;
use parking_lot::{Condvar, Mutex};

use crate::error::ResolveError;

/// How often a waiter wakes to re-check the interrupt flag while another
/// caller's build is in flight.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Slot<T> {
    Building,
    Done(Result<T, String>),
}

struct Latch<T> {
    mutex: Mutex<Slot<T>>,
    condvar: Condvar,
}

impl<T> Latch<T> {
    fn new() -> Self {
        Self { mutex: Mutex::new(Slot::Building), condvar: Condvar::new() }
    }
}

struct State<T> {
    /// Keys whose build has finished — served without ever touching a latch.
    results: HashMap<String, Result<T, String>>,
    /// Keys currently being built (or whose latch a waiter may still be
    /// parked on).
    building: HashMap<String, Arc<Latch<T>>>,
    /// Finished latches with no remaining waiter reference, ready to back
    /// the next unseen key.
    free: Vec<Arc<Latch<T>>>,
}

/// A map from canonical key to at-most-once-computed value, safe under
/// concurrent requests for the same key.
pub struct SingletonMap<T> {
    state: Mutex<State<T>>,
}

impl<T: Clone> Default for SingletonMap<T> {
    fn default() -> Self {
        Self { state: Mutex::new(State { results: HashMap::new(), building: HashMap::new(), free: Vec::new() }) }
    }
}

impl<T: Clone> SingletonMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or runs `build` exactly once
    /// across all concurrent callers and caches its outcome (success or
    /// failure) for the remainder of the scan. Waiters poll `interrupt` at
    /// each wakeup and bail out with [`ResolveError::Interrupted`] once set.
    pub fn get_or_build(
        &self,
        key: &str,
        interrupt: &InterruptFlag,
        build: impl FnOnce() -> Result<T, String>,
    ) -> Result<T, ResolveError> {
        let (latch, is_builder) = {
            let mut state = self.state.lock();
            if let Some(result) = state.results.get(key) {
                return to_result(key, result.clone());
            }
            if let Some(existing) = state.building.get(key) {
                (existing.clone(), false)
            } else {
                let latch = state.free.pop().unwrap_or_else(|| Arc::new(Latch::new()));
                *latch.mutex.lock() = Slot::Building;
                state.building.insert(key.to_string(), latch.clone());
                (latch, true)
            }
        };

        if is_builder {
            let outcome = build();
            *latch.mutex.lock() = Slot::Done(outcome.clone());
            latch.condvar.notify_all();

            let mut state = self.state.lock();
            state.results.insert(key.to_string(), outcome.clone());
            state.building.remove(key);
            // Only the map's own (just-removed) reference and this local
            // binding should exist at this point; if so, no waiter is
            // parked on the latch and it's safe to recycle. If a waiter is
            // still holding a clone, skip recycling and let it drop on its
            // own once that waiter returns.
            if Arc::strong_count(&latch) == 1 {
                state.free.push(latch);
            }
            drop(state);

            return to_result(key, outcome);
        }

        let mut slot = latch.mutex.lock();
        loop {
            match &*slot {
                Slot::Building => {
                    if interrupt.is_set() {
                        return Err(ResolveError::Interrupted);
                    }
                    latch.condvar.wait_for(&mut slot, POLL_INTERVAL);
                }
                Slot::Done(outcome) => return to_result(key, outcome.clone()),
            }
        }
    }
}

fn to_result<T>(key: &str, outcome: Result<T, String>) -> Result<T, ResolveError> {
    outcome.map_err(|message| ResolveError::CachedBuildFailure { key: key.to_string(), message })
}
