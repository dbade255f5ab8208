//! Remote persistence and session boundary traits.
//!
//! Both traits report failures through the `Result` channel, never by
//! panicking across the boundary: callers treat remote failures as
//! non-fatal and local state stays authoritative.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::user::UserIdentity;

/// Uniform async document read/write capability.
///
/// One document per user under the `users` collection, keyed by
/// `user.id`. Writes use merge semantics when `merge` is set: fields
/// absent from the payload do not clobber unrelated remote fields,
/// while present fields overwrite per the last-write rule.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document; absence is `Ok(None)`, not an error.
    async fn read_document(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>>;

    /// Writes a document, merging when `merge` is set.
    async fn write_document(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
        merge: bool,
    ) -> Result<()>;
}

/// Session state machine reported by a [`SessionSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial probe still in flight.
    Checking,
    /// A session exists for this identity.
    Identified(UserIdentity),
    /// No session.
    Anonymous,
}

impl SessionState {
    /// Returns the identity when identified.
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            SessionState::Identified(identity) => Some(identity),
            _ => None,
        }
    }
}

/// A long-lived source of session/identity changes.
///
/// On subscribe, the current session is reported immediately (or on the
/// first poll tick for remote probes), then changes keep flowing until
/// the subscription is stopped.
pub trait SessionSource: Send + Sync {
    fn subscribe(&self) -> SessionSubscription;
}

/// Handle to an active session subscription.
///
/// Dropping the handle without calling [`stop`](Self::stop) leaves the
/// underlying task running; stopping is the explicit unsubscribe
/// contract.
pub struct SessionSubscription {
    receiver: watch::Receiver<SessionState>,
    stop: Box<dyn FnOnce() + Send + Sync>,
}

impl SessionSubscription {
    /// Wraps a watch receiver and a stop action for the producing task.
    pub fn new(receiver: watch::Receiver<SessionState>, stop: Box<dyn FnOnce() + Send + Sync>) -> Self {
        Self { receiver, stop }
    }

    /// The most recently reported session state.
    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// Waits for the next state change. Returns `Err` when the producing
    /// task has gone away.
    pub async fn changed(&mut self) -> std::result::Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }

    /// Stops the producing task.
    ///
    /// Returns the underlying receiver so callers can confirm
    /// termination: once the task drops its sender, `changed` yields
    /// `Err`.
    pub fn stop(self) -> watch::Receiver<SessionState> {
        (self.stop)();
        self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_reports_current_and_changes() {
        let (tx, rx) = watch::channel(SessionState::Checking);
        let mut sub = SessionSubscription::new(rx, Box::new(|| ()));
        assert_eq!(sub.current(), SessionState::Checking);

        tx.send_replace(SessionState::Anonymous);
        sub.changed().await.unwrap();
        assert_eq!(sub.current(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_stop_invokes_the_stop_action() {
        let (_tx, rx) = watch::channel(SessionState::Checking);
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let sub = SessionSubscription::new(
            rx,
            Box::new(move || {
                let _ = done_tx.send(());
            }),
        );
        sub.stop();
        assert!(done_rx.try_recv().is_ok());
    }
}
