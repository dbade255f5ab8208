//! Chat bridge: a single-slot pending-message channel.
//!
//! Any surface can inject a message into the assistant; the consumer
//! observes the slot, activates itself, consumes the message exactly
//! once and resets the slot. The slot always holds the most recent
//! pending value: two sends before a take deliver only the latest
//! (last-write-wins on the slot, not a queue).

use tokio::sync::watch;

/// Single-slot pending message channel for the assistant surface.
///
/// Cheap to clone; all clones share the same slot.
#[derive(Clone)]
pub struct ChatBridge {
    slot: watch::Sender<Option<String>>,
}

impl ChatBridge {
    /// Creates an empty bridge.
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Sets the slot, overwriting any unconsumed previous value.
    /// `None` clears the slot.
    pub fn send(&self, message: Option<String>) {
        self.slot.send_replace(message);
    }

    /// The current pending value without consuming it.
    pub fn pending(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Takes and clears the pending value atomically.
    pub fn take(&self) -> Option<String> {
        self.slot.send_replace(None)
    }

    /// A receiver for observing slot updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.slot.subscribe()
    }
}

impl Default for ChatBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_send_wins() {
        let bridge = ChatBridge::new();
        bridge.send(Some("A".to_string()));
        bridge.send(Some("B".to_string()));
        // Consumer observes only the latest value.
        assert_eq!(bridge.take(), Some("B".to_string()));
        assert_eq!(bridge.take(), None);
    }

    #[test]
    fn test_take_resets_the_slot() {
        let bridge = ChatBridge::new();
        bridge.send(Some("hello".to_string()));
        assert_eq!(bridge.pending(), Some("hello".to_string()));
        assert_eq!(bridge.take(), Some("hello".to_string()));
        assert_eq!(bridge.pending(), None);
    }

    #[tokio::test]
    async fn test_subscribers_observe_updates() {
        let bridge = ChatBridge::new();
        let mut rx = bridge.subscribe();
        bridge.send(Some("ping".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().clone(), Some("ping".to_string()));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let bridge = ChatBridge::new();
        let other = bridge.clone();
        bridge.send(Some("shared".to_string()));
        assert_eq!(other.take(), Some("shared".to_string()));
        assert_eq!(bridge.pending(), None);
    }
}
