//! Startup-resolved persistence backend.
//!
//! The real-vs-local decision is made exactly once, from configuration
//! validity, and carried as a tagged variant. Both arms expose the same
//! capability surface (document store + session source), so no other
//! component ever asks "is this the mock?".

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use axent_core::state::SnapshotCache;
use axent_core::sync::{DocumentStore, SessionSource};

use crate::config::AxentConfig;
use crate::local_session::LocalSessionSource;
use crate::remote::{HttpDocumentStore, HttpSessionSource, RemoteSettings};

/// Which persistence backend was selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Remote document backend configured and minimally valid.
    Remote,
    /// No usable remote backend; fully functional local-only mode.
    LocalOnly,
}

/// The resolved backend: an optional document store and the session
/// source matching the selected mode.
pub struct PersistenceBackend {
    pub mode: BackendMode,
    pub document_store: Option<Arc<dyn DocumentStore>>,
    pub session_source: Arc<dyn SessionSource>,
}

/// Decides the backend mode once, at startup.
///
/// Remote mode requires a `[remote]` section with a non-empty base URL
/// and an API key longer than a placeholder would be. Anything else
/// falls back to local-only mode, which is expected steady state rather
/// than an error; the decision is never re-evaluated at runtime.
pub fn resolve_backend(config: &AxentConfig, cache: Arc<dyn SnapshotCache>) -> PersistenceBackend {
    let poll_interval = Duration::from_millis(config.session.poll_interval_ms);

    if let Some(remote) = &config.remote {
        if !remote.base_url.is_empty() && remote.api_key.len() > 5 {
            let settings = RemoteSettings {
                base_url: remote.base_url.clone(),
                api_key: remote.api_key.clone(),
            };
            info!(base_url = %settings.base_url, "remote document backend selected");
            return PersistenceBackend {
                mode: BackendMode::Remote,
                document_store: Some(Arc::new(HttpDocumentStore::new(&settings))),
                session_source: Arc::new(HttpSessionSource::new(&settings, poll_interval)),
            };
        }
    }

    info!("no usable remote backend, running in local-first storage mode");
    PersistenceBackend {
        mode: BackendMode::LocalOnly,
        document_store: None,
        session_source: Arc::new(LocalSessionSource::with_interval(cache, poll_interval)),
    }
}
