//! Wrapper construction and lifecycle.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::damper::Damper;
use super::registry::TimerRegistry;
use super::variant::Variant;
use crate::bus::ContextChangeBus;
use crate::config::DamperOptions;
use crate::error::{DamperError, Result};
use crate::refresh::RefreshContext;

/// Creates rate-limited wrappers and ties their pending timers to a
/// context-change bus.
///
/// All wrappers built by one factory share its [`TimerRegistry`]; a
/// context-change event flushes every live timer in one sweep. Dropping
/// the factory stops the bus listener, while existing wrappers keep
/// working against the shared registry.
pub struct DamperFactory {
    /// Registry shared by every wrapper from this factory
    registry: Arc<TimerRegistry>,
    /// Runtime the deferred timers run on
    runtime: Handle,
    /// Bus listener task, aborted on drop
    listener: JoinHandle<()>,
}

impl DamperFactory {
    /// Create a factory with its own registry, subscribed to `bus`.
    pub fn new(bus: &ContextChangeBus) -> Result<Self> {
        Self::with_registry(Arc::new(TimerRegistry::new()), bus)
    }

    /// Create a factory around an existing registry.
    ///
    /// Fails fast when called outside a tokio reactor: wrappers need the
    /// runtime's timer to schedule deferred executions, and that is better
    /// surfaced at construction than on the first deferred call.
    pub fn with_registry(registry: Arc<TimerRegistry>, bus: &ContextChangeBus) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| DamperError::Runtime(e.to_string()))?;

        let mut rx = bus.subscribe();
        let listener = runtime.spawn({
            let registry = Arc::clone(&registry);
            async move {
                loop {
                    match rx.recv().await {
                        Ok(()) => registry.flush_all(),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Context-change listener lagged; flushing anyway");
                            registry.flush_all();
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        });

        debug!("Damper factory subscribed to context-change bus");
        Ok(Self {
            registry,
            runtime,
            listener,
        })
    }

    /// Wrap `callback` according to `options`.
    pub fn wrap<T, F>(
        &self,
        options: DamperOptions,
        refresh: Arc<dyn RefreshContext>,
        callback: F,
    ) -> Damper<T>
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        Damper::new(
            options.variant,
            options.delay(),
            options.no_trailing,
            Box::new(callback),
            refresh,
            Arc::clone(&self.registry),
            self.runtime.clone(),
        )
    }

    /// Throttle: leading-edge execution, then at most once per delay.
    pub fn throttle<T, F>(
        &self,
        delay_ms: u64,
        refresh: Arc<dyn RefreshContext>,
        callback: F,
    ) -> Damper<T>
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.wrap(DamperOptions::new(Variant::Throttle, delay_ms), refresh, callback)
    }

    /// Debounce: fires once the delay has passed since the last effective
    /// execution.
    pub fn debounce<T, F>(
        &self,
        delay_ms: u64,
        refresh: Arc<dyn RefreshContext>,
        callback: F,
    ) -> Damper<T>
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.wrap(DamperOptions::new(Variant::Debounce, delay_ms), refresh, callback)
    }

    /// Wait-last: only the most recent call of a burst executes, one full
    /// delay after that call.
    pub fn wait_last<T, F>(
        &self,
        delay_ms: u64,
        refresh: Arc<dyn RefreshContext>,
        callback: F,
    ) -> Damper<T>
    where
        T: Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.wrap(DamperOptions::new(Variant::WaitLast, delay_ms), refresh, callback)
    }

    /// The timer registry shared by this factory's wrappers.
    pub fn registry(&self) -> &Arc<TimerRegistry> {
        &self.registry
    }
}

impl Drop for DamperFactory {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
