//! Broadcast bus for observing dispatched actions.
//!
//! # Guarantees
//!
//! - **Post-reduction**: An envelope is published only after its action has
//!   been reduced, in reduction order
//! - **At-most-once delivery**: Slow receivers may miss actions
//! - **No replay**: Lagged receivers get `RecvError::Lagged`
//!
//! The bus is an observation channel (request/response helpers, recorders,
//! logging). It plays no part in reduction or runner scheduling.

use tokio::sync::broadcast;

use crate::core::{Action, ActionEnvelope, CorrelationId};

/// Default channel capacity for the action bus.
pub(crate) const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast channel of dispatched action envelopes.
pub struct ActionBus<A> {
    sender: broadcast::Sender<ActionEnvelope<A>>,
}

impl<A: Action> ActionBus<A> {
    /// Create a new action bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new action bus with the specified capacity.
    ///
    /// The capacity determines how many envelopes can be buffered before
    /// slow receivers start lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an action with a specific correlation ID.
    ///
    /// Returns the number of receivers that received the envelope.
    pub fn publish(&self, action: A, cid: CorrelationId) -> usize {
        self.publish_envelope(ActionEnvelope::new(cid, action))
    }

    /// Publish an envelope directly.
    pub fn publish_envelope(&self, envelope: ActionEnvelope<A>) -> usize {
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to envelopes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ActionEnvelope<A>> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<A: Action> Default for ActionBus<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for ActionBus<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A> std::fmt::Debug for ActionBus<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);

    impl Action for Ping {
        fn tag(&self) -> &'static str {
            "test.ping"
        }
    }

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = ActionBus::new();
        let mut receiver = bus.subscribe();

        let cid = CorrelationId::new();
        bus.publish(Ping(42), cid);

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(*envelope.action, Ping(42));
        assert_eq!(envelope.cid, cid);
    }

    #[tokio::test]
    async fn test_publish_returns_receiver_count() {
        let bus = ActionBus::new();
        assert_eq!(bus.publish(Ping(1), CorrelationId::NONE), 0);

        let _r1 = bus.subscribe();
        assert_eq!(bus.publish(Ping(2), CorrelationId::NONE), 1);

        let _r2 = bus.subscribe();
        assert_eq!(bus.publish(Ping(3), CorrelationId::NONE), 2);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_actions() {
        let bus = ActionBus::new();
        bus.publish(Ping(1), CorrelationId::NONE);

        let mut receiver = bus.subscribe();
        bus.publish(Ping(2), CorrelationId::NONE);

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(*envelope.action, Ping(2));
    }

    #[test]
    fn test_debug_impl() {
        let bus: ActionBus<Ping> = ActionBus::new();
        let _r = bus.subscribe();
        let debug_str = format!("{:?}", bus);
        assert!(debug_str.contains("subscriber_count"));
    }
}
