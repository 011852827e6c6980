//! Shared registry of pending deferred executions.

use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::{debug, trace};
use uuid::Uuid;

/// Tracks the pending deferred execution of every live wrapper.
///
/// An entry exists if and only if the wrapper currently has an unfired
/// deferred execution scheduled. A context-change flush cancels every
/// registered timer and empties the map in one sweep.
pub struct TimerRegistry {
    /// Pending timers indexed by wrapper id
    timers: DashMap<Uuid, AbortHandle>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            timers: DashMap::new(),
        }
    }

    /// Record the pending execution for a wrapper, replacing any previous
    /// entry. The caller has already cancelled the superseded timer.
    pub fn register(&self, id: Uuid, handle: AbortHandle) {
        trace!(id = %id, "Registering pending timer");
        self.timers.insert(id, handle);
    }

    /// Drop a wrapper's entry. Clearing an absent entry is a no-op.
    pub fn clear(&self, id: Uuid) {
        self.timers.remove(&id);
    }

    /// Cancel every registered timer and empty the registry.
    ///
    /// Cancelling an already-fired or already-cancelled timer is a no-op,
    /// so the sweep is always safe.
    pub fn flush_all(&self) {
        let count = self.timers.len();
        self.timers.retain(|_, handle| {
            handle.abort();
            false
        });
        debug!(count, "Flushed pending timers");
    }

    /// Number of wrappers with a pending deferred execution.
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
