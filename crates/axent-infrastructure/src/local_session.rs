//! Fallback session source for local-only mode.
//!
//! When no remote identity backend is configured, an equivalent session
//! signal is synthesized from the cached identity record: the record is
//! polled on a repeating timer (default 1s, never more) so a logout
//! performed elsewhere in the same process is observed without any push
//! primitive. The subscription carries an explicit stop contract; the
//! poll is a cancellable task, not a fire-and-forget loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use axent_core::state::SnapshotCache;
use axent_core::sync::{SessionSource, SessionState, SessionSubscription};

/// Default poll interval for the identity record.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Session source polling the snapshot cache's identity record.
pub struct LocalSessionSource {
    cache: Arc<dyn SnapshotCache>,
    poll_interval: Duration,
}

impl LocalSessionSource {
    /// Creates a source with the default 1s interval.
    pub fn new(cache: Arc<dyn SnapshotCache>) -> Self {
        Self::with_interval(cache, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a source with an explicit interval (clamped to ≤ 1s).
    pub fn with_interval(cache: Arc<dyn SnapshotCache>, poll_interval: Duration) -> Self {
        Self {
            cache,
            poll_interval: poll_interval.min(DEFAULT_POLL_INTERVAL),
        }
    }

    fn current_state(cache: &dyn SnapshotCache) -> SessionState {
        match cache.load_identity() {
            Some(identity) => SessionState::Identified(identity),
            None => SessionState::Anonymous,
        }
    }
}

impl SessionSource for LocalSessionSource {
    fn subscribe(&self) -> SessionSubscription {
        // The current session is reported synchronously, before the
        // first poll tick.
        let initial = Self::current_state(self.cache.as_ref());
        let (tx, rx) = watch::channel(initial);

        let token = CancellationToken::new();
        let task_token = token.clone();
        let cache = Arc::clone(&self.cache);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.tick().await; // the initial state was already reported
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let next = Self::current_state(cache.as_ref());
                        tx.send_if_modified(|current| {
                            if *current == next {
                                false
                            } else {
                                *current = next;
                                true
                            }
                        });
                    }
                }
            }
        });

        SessionSubscription::new(rx, Box::new(move || token.cancel()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axent_core::user::UserIdentity;
    use tempfile::TempDir;

    use crate::snapshot_cache::FileSnapshotCache;

    fn identity() -> UserIdentity {
        UserIdentity {
            uid: "u-1".to_string(),
            display_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_current_session_on_subscribe() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(FileSnapshotCache::open(dir.path()));
        cache.save_identity(&identity()).unwrap();

        let source = LocalSessionSource::new(cache);
        let sub = source.subscribe();
        assert_eq!(sub.current(), SessionState::Identified(identity()));
        sub.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_observes_identity_clear_within_a_poll_tick() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(FileSnapshotCache::open(dir.path()));
        cache.save_identity(&identity()).unwrap();

        let source = LocalSessionSource::new(cache.clone());
        let mut sub = source.subscribe();
        assert_eq!(sub.current(), SessionState::Identified(identity()));

        // A logout elsewhere in the process clears the record.
        cache.clear_identity().unwrap();
        sub.changed().await.unwrap();
        assert_eq!(sub.current(), SessionState::Anonymous);
        sub.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_the_polling_task() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(FileSnapshotCache::open(dir.path()));

        let source = LocalSessionSource::new(cache.clone());
        let sub = source.subscribe();
        let mut rx = sub.stop();

        // The task drops its sender on cancellation, so the channel
        // closes instead of reporting the sign-in below.
        cache.save_identity(&identity()).unwrap();
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_is_clamped_to_one_second() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(FileSnapshotCache::open(dir.path()));
        let source =
            LocalSessionSource::with_interval(cache.clone(), Duration::from_secs(30));

        let mut sub = source.subscribe();
        assert_eq!(sub.current(), SessionState::Anonymous);

        cache.save_identity(&identity()).unwrap();
        // Observed within the clamped 1s window, not 30s.
        tokio::time::timeout(Duration::from_millis(1500), sub.changed())
            .await
            .expect("poll should fire within the clamped interval")
            .unwrap();
        assert_eq!(sub.current(), SessionState::Identified(identity()));
        sub.stop();
    }
}
