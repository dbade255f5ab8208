//! Snapshot cache trait: durable, device-scoped key-value storage.

use crate::error::Result;
use crate::state::model::AppState;
use crate::user::UserIdentity;

/// Durable local storage for the application snapshot and the identity
/// record.
///
/// Three independent keys: the whole-state snapshot (key A), the reduced
/// identity record used by the session layer (key B), and the dark-mode
/// preference with its own lifecycle (key C).
///
/// All operations are synchronous by contract: the snapshot write is the
/// durability guarantee and must complete before the next mutation is
/// observed, so it is never batched or deferred.
pub trait SnapshotCache: Send + Sync {
    /// Loads the cached snapshot.
    ///
    /// A corrupt snapshot must surface as `Ok(None)` so startup can fall
    /// back to the empty default state instead of failing.
    fn load_snapshot(&self) -> Result<Option<AppState>>;

    /// Writes the full snapshot (last write wins on the shared key).
    fn save_snapshot(&self, state: &AppState) -> Result<()>;

    /// Loads the identity record, if a session exists.
    fn load_identity(&self) -> Option<UserIdentity>;

    /// Writes the identity record, kept in lock-step with `user`.
    fn save_identity(&self, identity: &UserIdentity) -> Result<()>;

    /// Removes the identity record (explicit logout only).
    fn clear_identity(&self) -> Result<()>;

    /// Loads the dark-mode preference; defaults to `false`.
    fn load_dark_mode(&self) -> bool;

    /// Writes the dark-mode preference.
    fn save_dark_mode(&self, enabled: bool) -> Result<()>;
}
