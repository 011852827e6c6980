//! The wrapper state machine: per-call scheduling decisions.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::trace;
use uuid::Uuid;

use super::registry::TimerRegistry;
use super::variant::Variant;
use crate::refresh::RefreshContext;

/// A rate-limited wrapper around a callback.
///
/// Each call to [`Damper::call`] runs the scheduling algorithm: execute
/// immediately, schedule a deferred execution, or supersede an existing
/// pending one. At most one deferred execution per wrapper is ever live.
///
/// Cloning is cheap and shares the wrapper's state; clones never gain
/// independent timers.
pub struct Damper<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Damper<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<T> {
    /// Registry key for this wrapper
    id: Uuid,
    /// Scheduling variant
    variant: Variant,
    /// Minimum spacing or quiet period between effective executions
    delay: Duration,
    /// Suppress the trailing execution after a burst ends
    no_trailing: bool,
    /// The wrapped callback
    callback: Box<dyn Fn(&T) + Send + Sync>,
    /// Refresh context notified after each execution
    refresh: Arc<dyn RefreshContext>,
    /// Registry shared with the owning factory
    registry: Arc<TimerRegistry>,
    /// Runtime the deferred timers run on
    runtime: Handle,
    /// Mutable scheduling state, owned exclusively by this wrapper
    state: Mutex<CallState>,
}

/// Mutable per-wrapper state.
struct CallState {
    /// Timestamp of the last effective execution. `None` until the first
    /// one, which makes a fresh throttle execute immediately.
    last_exec: Option<Instant>,
    /// Abort handle of the currently scheduled deferred execution.
    pending: Option<AbortHandle>,
}

impl<T: Send + 'static> Damper<T> {
    pub(crate) fn new(
        variant: Variant,
        delay: Duration,
        no_trailing: bool,
        callback: Box<dyn Fn(&T) + Send + Sync>,
        refresh: Arc<dyn RefreshContext>,
        registry: Arc<TimerRegistry>,
        runtime: Handle,
    ) -> Self {
        let now = Instant::now();
        Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                variant,
                delay,
                no_trailing,
                callback,
                refresh,
                registry,
                runtime,
                state: Mutex::new(CallState {
                    last_exec: variant.seed(now),
                    pending: None,
                }),
            }),
        }
    }

    /// Run the scheduling algorithm for one invocation.
    ///
    /// Returns immediately; the callback runs either synchronously within
    /// this call or later from the deferred timer task.
    pub fn call(&self, args: T) {
        Shared::invoke(&self.shared, args);
    }

    /// Registry key of this wrapper.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Whether a deferred execution is currently scheduled.
    pub fn has_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl<T: Send + 'static> Shared<T> {
    fn invoke(this: &Arc<Self>, args: T) {
        let now = Instant::now();
        let mut state = this.state.lock();

        // A newer call always supersedes the pending trailing run.
        if let Some(handle) = state.pending.take() {
            handle.abort();
            this.registry.clear(this.id);
        }

        let elapsed = this.variant.elapsed(now, state.last_exec);
        if elapsed > this.delay {
            state.last_exec = Some(now);
            // Release the lock before the callback so re-entrant calls from
            // inside it take the normal path instead of deadlocking.
            drop(state);
            trace!(id = %this.id, "Executing immediately");
            this.run_callback(&args);
        } else if !this.no_trailing {
            let remaining = this.delay - elapsed;
            trace!(
                id = %this.id,
                remaining_ms = remaining.as_millis() as u64,
                "Deferring execution"
            );
            let task = this.runtime.spawn({
                let shared = Arc::clone(this);
                async move {
                    tokio::time::sleep(remaining).await;
                    Shared::fire(&shared, args);
                }
            });
            let handle = task.abort_handle();
            this.registry.register(this.id, handle.clone());
            state.pending = Some(handle);
        }
    }

    /// Deferred execution, entered from the timer task.
    fn fire(this: &Arc<Self>, args: T) {
        {
            let mut state = this.state.lock();
            state.last_exec = Some(Instant::now());
            state.pending = None;
            this.registry.clear(this.id);
        }
        trace!(id = %this.id, "Executing deferred run");
        this.run_callback(&args);
    }

    fn run_callback(&self, args: &T) {
        (self.callback)(args);
        if !self.refresh.is_refresh_in_progress() {
            self.refresh.trigger_refresh();
        }
    }
}
