//! The application state store: sole owner of the `AppState` aggregate.
//!
//! Every mutation runs the same pipeline under the state lock: apply the
//! pure mutation, synchronously persist the full snapshot to the local
//! cache (the durability guarantee), fire a best-effort merge write to
//! the remote document store when one is configured, then publish the
//! committed snapshot on the watch channel. Remote failures are logged
//! and swallowed; they never surface to the mutating caller and never
//! block local persistence.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::warn;

use crate::error::Result;
use crate::journal::{Activity, AttendanceRecord, DiaryEntry};
use crate::planner::{Subject, SubjectPatch, Topic, TopicPatch};
use crate::state::cache::SnapshotCache;
use crate::state::model::AppState;
use crate::sync::DocumentStore;
use crate::user::User;

/// Remote collection holding one snapshot document per user.
pub const USERS_COLLECTION: &str = "users";

/// Owns the in-memory aggregate and mediates all mutations.
///
/// Constructed once at application start and injected everywhere by
/// `Arc`; never a module-level singleton, so tests can run isolated
/// instances side by side.
pub struct AppStateStore {
    state: Mutex<AppState>,
    cache: Arc<dyn SnapshotCache>,
    remote: Option<Arc<dyn DocumentStore>>,
    published: watch::Sender<AppState>,
    degraded: watch::Sender<bool>,
}

impl AppStateStore {
    /// Loads the store from the cached snapshot.
    ///
    /// A missing or corrupt snapshot falls back to the empty default
    /// state; startup never fails on bad local data.
    pub fn load(cache: Arc<dyn SnapshotCache>, remote: Option<Arc<dyn DocumentStore>>) -> Self {
        let initial = match cache.load_snapshot() {
            Ok(Some(state)) => state,
            Ok(None) => AppState::default(),
            Err(err) => {
                warn!(error = %err, "failed to load cached snapshot, starting empty");
                AppState::default()
            }
        };
        let (published, _) = watch::channel(initial.clone());
        let (degraded, _) = watch::channel(false);
        Self {
            state: Mutex::new(initial),
            cache,
            remote,
            published,
            degraded,
        }
    }

    /// A receiver over every committed snapshot (the reactive surface).
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.published.subscribe()
    }

    /// A receiver over the degraded-mode flag. Raised when the local
    /// cache stops accepting writes; state stays correct in memory but
    /// durability is lost until a write succeeds again.
    pub fn degraded(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// A clone of the current aggregate.
    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    /// Replaces the `user` slot wholesale. No validation at this layer.
    pub async fn set_user(&self, user: Option<User>) {
        let mut state = self.state.lock().await;
        state.set_user(user);
        self.commit(&state);
    }

    /// Appends a subject; duplicate ids are rejected before any side
    /// effect runs.
    pub async fn add_subject(&self, subject: Subject) -> Result<()> {
        let mut state = self.state.lock().await;
        state.add_subject(subject)?;
        self.commit(&state);
        Ok(())
    }

    /// Appends a topic; duplicate ids are rejected before any side
    /// effect runs.
    pub async fn add_topic(&self, topic: Topic) -> Result<()> {
        let mut state = self.state.lock().await;
        state.add_topic(topic)?;
        self.commit(&state);
        Ok(())
    }

    /// Merges fields into the matching subject; silently ignores an
    /// unknown id (no commit runs in that case).
    pub async fn update_subject(&self, id: &str, patch: SubjectPatch) {
        let mut state = self.state.lock().await;
        if state.update_subject(id, &patch) {
            self.commit(&state);
        }
    }

    /// Merges fields into the matching topic; silently ignores an
    /// unknown id.
    pub async fn update_topic(&self, id: &str, patch: TopicPatch) {
        let mut state = self.state.lock().await;
        if state.update_topic(id, &patch) {
            self.commit(&state);
        }
    }

    /// Removes a subject and cascade-deletes its topics.
    pub async fn delete_subject(&self, id: &str) {
        let mut state = self.state.lock().await;
        state.delete_subject(id);
        self.commit(&state);
    }

    /// Removes a topic.
    pub async fn delete_topic(&self, id: &str) {
        let mut state = self.state.lock().await;
        state.delete_topic(id);
        self.commit(&state);
    }

    /// Atomic bulk replace of both sequences, for generator output.
    pub async fn set_subjects_and_topics(&self, subjects: Vec<Subject>, topics: Vec<Topic>) {
        let mut state = self.state.lock().await;
        state.set_subjects_and_topics(subjects, topics);
        self.commit(&state);
    }

    /// Prepends a diary entry.
    pub async fn add_diary_entry(&self, entry: DiaryEntry) {
        let mut state = self.state.lock().await;
        state.add_diary_entry(entry);
        self.commit(&state);
    }

    /// Prepends an activity record.
    pub async fn add_activity(&self, activity: Activity) {
        let mut state = self.state.lock().await;
        state.add_activity(activity);
        self.commit(&state);
    }

    /// Prepends an attendance record.
    pub async fn add_attendance(&self, record: AttendanceRecord) {
        let mut state = self.state.lock().await;
        state.add_attendance(record);
        self.commit(&state);
    }

    /// Whole-document overwrite from a remote snapshot (session restore).
    ///
    /// Persists locally and publishes, but skips the remote write: the
    /// data just came from remote and echoing it back could clobber a
    /// newer write from another session.
    pub async fn replace_state(&self, next: AppState) {
        let mut state = self.state.lock().await;
        *state = next;
        self.persist_local(&state);
        self.published.send_replace(state.clone());
    }

    /// Clears the aggregate to its empty default and removes the cached
    /// identity record. The only operation that touches both in-memory
    /// state and the identity boundary.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;
        *state = AppState::default();
        if let Err(err) = self.cache.clear_identity() {
            warn!(error = %err, "failed to clear identity record on logout");
        }
        self.persist_local(&state);
        self.published.send_replace(state.clone());
    }

    /// Runs the full commit pipeline for a mutated state, in order:
    /// local persist, opportunistic remote write, publish.
    ///
    /// Called with the state lock held, so local cache writes are
    /// serialized in mutation order (last write wins on the shared key).
    fn commit(&self, state: &AppState) {
        self.persist_local(state);
        self.sync_remote(state);
        self.published.send_replace(state.clone());
    }

    /// Local snapshot write plus the lock-step identity record.
    fn persist_local(&self, state: &AppState) {
        let mut healthy = true;
        if let Err(err) = self.cache.save_snapshot(state) {
            warn!(error = %err, "local snapshot write failed, running degraded");
            healthy = false;
        }
        if let Some(user) = &state.user {
            if let Err(err) = self.cache.save_identity(&user.identity()) {
                warn!(error = %err, "identity record write failed");
                healthy = false;
            }
        }
        self.degraded.send_replace(!healthy);
    }

    /// Best-effort merge write of the snapshot to `users/{user.id}`.
    ///
    /// Writes fire in mutation order with no retry queue and no
    /// cancellation of in-flight writes; an in-flight write that loses a
    /// race with a later one may clobber newer data remotely. Accepted
    /// weak-consistency trade-off for the opportunistic path.
    fn sync_remote(&self, state: &AppState) {
        let (Some(remote), Some(user)) = (&self.remote, &state.user) else {
            return;
        };
        let document = match serde_json::to_value(state) {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "failed to serialize snapshot for remote sync");
                return;
            }
        };
        let remote = Arc::clone(remote);
        let user_id = user.id.clone();
        tokio::spawn(async move {
            if let Err(err) = remote
                .write_document(USERS_COLLECTION, &user_id, &document, true)
                .await
            {
                warn!(error = %err, user_id = %user_id, "remote snapshot write failed");
            }
        });
    }
}
