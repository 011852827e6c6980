//! Context-change notification bus.

use tokio::sync::broadcast;

/// Events buffered per subscriber before the channel reports lag.
const CHANNEL_CAPACITY: usize = 16;

/// Broadcasts context-change events (e.g. a navigation) to subscribers.
///
/// The damper factory subscribes once at construction and flushes its
/// timer registry on every event. Events carry no payload; the change
/// itself is the signal.
pub struct ContextChangeBus {
    tx: broadcast::Sender<()>,
}

impl ContextChangeBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announce a context change. Sending with zero subscribers is fine.
    pub fn notify_change(&self) {
        let _ = self.tx.send(());
    }

    /// Subscribe to context-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ContextChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = ContextChangeBus::new();
        let mut rx = bus.subscribe();

        bus.notify_change();
        rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_noop() {
        let bus = ContextChangeBus::new();
        bus.notify_change();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_receivers() {
        let bus = ContextChangeBus::new();
        let rx_a = bus.subscribe();
        let rx_b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx_a);
        drop(rx_b);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
