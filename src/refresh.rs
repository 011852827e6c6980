//! Refresh-context collaborator: post-execution refresh requests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

/// Interface the scheduler needs from the owning refresh context.
///
/// After an executed callback the scheduler requests a refresh, but only
/// when none is already in progress.
pub trait RefreshContext: Send + Sync {
    /// Whether a refresh is currently being applied.
    fn is_refresh_in_progress(&self) -> bool;

    /// Request a refresh. Safe to call repeatedly.
    fn trigger_refresh(&self);
}

/// A refresh signal connecting the scheduler to a render loop.
///
/// The loop marks its refresh window with [`RefreshSignal::begin`] and
/// awaits [`RefreshSignal::requested`] for wake-ups; the scheduler sees
/// the in-progress flag through the [`RefreshContext`] impl and skips
/// redundant requests.
pub struct RefreshSignal {
    in_progress: AtomicBool,
    requests: AtomicU64,
    notify: Notify,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
            requests: AtomicU64::new(0),
            notify: Notify::new(),
        }
    }

    /// Mark the start of a refresh; the flag clears when the guard drops.
    pub fn begin(&self) -> RefreshGuard<'_> {
        self.in_progress.store(true, Ordering::SeqCst);
        RefreshGuard { signal: self }
    }

    /// Wait until a refresh has been requested.
    pub async fn requested(&self) {
        self.notify.notified().await;
    }

    /// Total number of refresh requests so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshContext for RefreshSignal {
    fn is_refresh_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    fn trigger_refresh(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_one();
    }
}

/// Clears the in-progress flag when dropped.
pub struct RefreshGuard<'a> {
    signal: &'a RefreshSignal,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.signal.in_progress.store(false, Ordering::SeqCst);
    }
}
