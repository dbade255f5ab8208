//! File-backed snapshot cache.
//!
//! Three single-document JSON files under the Axent config directory:
//! the full snapshot, the reduced identity record, and the preferences
//! document. The identity file is shared with the fallback session poll,
//! which reads it with the same shape to avoid desynchronization.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use axent_core::error::Result;
use axent_core::state::{AppState, SnapshotCache};
use axent_core::user::UserIdentity;

use crate::paths::AxentPaths;
use crate::storage::AtomicJsonFile;

/// UI preferences with a lifecycle independent from the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Preferences {
    #[serde(default)]
    dark_mode: bool,
}

/// `SnapshotCache` implementation over atomic JSON files.
pub struct FileSnapshotCache {
    snapshot: AtomicJsonFile<AppState>,
    identity: AtomicJsonFile<UserIdentity>,
    preferences: AtomicJsonFile<Preferences>,
}

impl FileSnapshotCache {
    /// Opens the cache at the platform default location.
    pub fn open_default() -> Result<Self> {
        let dir = AxentPaths::config_dir()
            .map_err(|e| axent_core::AxentError::config(e.to_string()))?;
        Ok(Self::open(&dir))
    }

    /// Opens the cache rooted at an explicit directory (used in tests).
    pub fn open(dir: &Path) -> Self {
        Self {
            snapshot: AtomicJsonFile::new(dir.join("snapshot.json")),
            identity: AtomicJsonFile::new(dir.join("identity.json")),
            preferences: AtomicJsonFile::new(dir.join("preferences.json")),
        }
    }
}

impl SnapshotCache for FileSnapshotCache {
    fn load_snapshot(&self) -> Result<Option<AppState>> {
        match self.snapshot.load() {
            Ok(state) => Ok(state),
            Err(err) if err.is_serialization() => {
                // Corrupt snapshot: fall back to the empty default rather
                // than failing app startup.
                warn!(error = %err, "cached snapshot is corrupt, ignoring it");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn save_snapshot(&self, state: &AppState) -> Result<()> {
        self.snapshot.save(state)
    }

    fn load_identity(&self) -> Option<UserIdentity> {
        self.identity.load().ok().flatten()
    }

    fn save_identity(&self, identity: &UserIdentity) -> Result<()> {
        self.identity.save(identity)
    }

    fn clear_identity(&self) -> Result<()> {
        self.identity.remove()
    }

    fn load_dark_mode(&self) -> bool {
        self.preferences
            .load()
            .ok()
            .flatten()
            .map(|p| p.dark_mode)
            .unwrap_or(false)
    }

    fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        let mut preferences = self.preferences.load().ok().flatten().unwrap_or_default();
        preferences.dark_mode = enabled;
        self.preferences.save(&preferences)
    }
}
