//! Session observer: drives the session state machine and restores the
//! remote snapshot on sign-in.
//!
//! Consumes a [`SessionSource`] subscription on a background task and
//! republishes the observed state. When the session becomes identified
//! and a remote document store is configured, the user's remote snapshot
//! is fetched and applied as a whole-document replace. A read that
//! completes after the session has already moved on is discarded rather
//! than applied under the wrong identity.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use axent_core::state::{AppState, AppStateStore, USERS_COLLECTION};
use axent_core::sync::{DocumentStore, SessionSource, SessionState, SessionSubscription};
use axent_core::user::UserIdentity;

/// Long-lived consumer of the session source.
pub struct SessionObserver {
    state: watch::Receiver<SessionState>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionObserver {
    /// Spawns the observer task. Requires a running tokio runtime.
    pub fn spawn(
        source: Arc<dyn SessionSource>,
        store: Arc<AppStateStore>,
        remote: Option<Arc<dyn DocumentStore>>,
    ) -> Self {
        let (tx, rx) = watch::channel(SessionState::Checking);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut subscription = source.subscribe();
            loop {
                let current = subscription.current();
                let moved = tx.send_if_modified(|slot| {
                    if *slot == current {
                        false
                    } else {
                        *slot = current.clone();
                        true
                    }
                });
                if moved {
                    match &current {
                        SessionState::Identified(identity) => {
                            info!(uid = %identity.uid, "session identified");
                            if let Some(remote) = &remote {
                                restore_snapshot(&store, remote, &subscription, identity).await;
                            }
                        }
                        SessionState::Anonymous => {
                            debug!("session is anonymous, local state stays authoritative");
                        }
                        SessionState::Checking => {}
                    }
                }

                tokio::select! {
                    _ = task_token.cancelled() => break,
                    changed = subscription.changed() => {
                        if changed.is_err() {
                            warn!("session source went away, stopping the observer");
                            break;
                        }
                    }
                }
            }
            subscription.stop();
        });

        Self {
            state: rx,
            token,
            handle,
        }
    }

    /// A receiver over the observed session states.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// The most recently observed session state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Stops the observer task and waits for it to finish.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

/// Fetches `users/{uid}` and replaces the aggregate wholesale.
///
/// Absence of a remote document is the first-login case: the next local
/// mutation seeds it through the normal commit pipeline. Unreadable
/// documents and transport failures leave local state untouched.
async fn restore_snapshot(
    store: &AppStateStore,
    remote: &Arc<dyn DocumentStore>,
    subscription: &SessionSubscription,
    identity: &UserIdentity,
) {
    match remote.read_document(USERS_COLLECTION, &identity.uid).await {
        Ok(Some(document)) => match serde_json::from_value::<AppState>(document) {
            Ok(snapshot) => {
                // The session may have moved while the read was in
                // flight; applying then would attach another user's data.
                let still_current = subscription
                    .current()
                    .identity()
                    .map(|current| current.uid == identity.uid)
                    .unwrap_or(false);
                if still_current {
                    info!(uid = %identity.uid, "restoring remote snapshot");
                    store.replace_state(snapshot).await;
                } else {
                    debug!(uid = %identity.uid, "session changed during restore, discarding");
                }
            }
            Err(err) => {
                warn!(error = %err, uid = %identity.uid, "remote snapshot is unreadable, keeping local state");
            }
        },
        Ok(None) => {
            debug!(uid = %identity.uid, "no remote snapshot yet");
        }
        Err(err) => {
            warn!(error = %err, uid = %identity.uid, "remote snapshot read failed, keeping local state");
        }
    }
}
