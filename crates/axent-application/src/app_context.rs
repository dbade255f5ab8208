//! Application composition root.
//!
//! Bootstraps configuration, the snapshot cache, the startup-resolved
//! persistence backend and every long-lived service. Constructed once,
//! explicitly, inside a running tokio runtime; nothing here is a
//! module-level singleton, so tests assemble isolated contexts freely.

use std::sync::Arc;

use tokio::sync::watch;

use axent_core::assistant::Assistant;
use axent_core::chat::ChatBridge;
use axent_core::error::Result;
use axent_core::state::{AppState, AppStateStore, SnapshotCache};
use axent_core::sync::SessionState;
use axent_infrastructure::{resolve_backend, AxentConfig, BackendMode, FileSnapshotCache};
use axent_interaction::GeminiAssistant;

use crate::chat_service::ChatService;
use crate::roadmap_service::RoadmapService;
use crate::session_observer::SessionObserver;

/// The assembled application.
pub struct AppContext {
    /// Backend mode resolved once at startup.
    pub mode: BackendMode,
    pub store: Arc<AppStateStore>,
    pub chat: Arc<ChatService>,
    pub roadmaps: RoadmapService,
    session: SessionObserver,
    cache: Arc<dyn SnapshotCache>,
}

impl AppContext {
    /// Bootstraps from the default configuration and cache locations.
    ///
    /// Must run inside a tokio runtime (the session observer spawns).
    pub fn bootstrap() -> Result<Self> {
        let config = AxentConfig::load()?;
        let cache: Arc<dyn SnapshotCache> = Arc::new(FileSnapshotCache::open_default()?);
        let assistant: Arc<dyn Assistant> = Arc::new(GeminiAssistant::new(
            config.assistant.api_key.clone(),
            config.assistant.model.clone(),
        ));
        Ok(Self::assemble(&config, cache, assistant))
    }

    /// Assembles the context from explicit collaborators.
    pub fn assemble(
        config: &AxentConfig,
        cache: Arc<dyn SnapshotCache>,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        let backend = resolve_backend(config, cache.clone());
        let store = Arc::new(AppStateStore::load(
            cache.clone(),
            backend.document_store.clone(),
        ));
        let bridge = ChatBridge::new();
        let chat = Arc::new(ChatService::new(
            store.clone(),
            assistant.clone(),
            bridge,
        ));
        let roadmaps = RoadmapService::new(store.clone(), assistant);
        let session =
            SessionObserver::spawn(backend.session_source, store.clone(), backend.document_store);

        Self {
            mode: backend.mode,
            store,
            chat,
            roadmaps,
            session,
            cache,
        }
    }

    /// A receiver over every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe()
    }

    /// A receiver over the observed session states.
    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.session.state()
    }

    /// A clone of the shared pending-message bridge.
    pub fn chat_bridge(&self) -> ChatBridge {
        self.chat.bridge().clone()
    }

    /// The persisted dark-mode preference.
    pub fn dark_mode(&self) -> bool {
        self.cache.load_dark_mode()
    }

    /// Persists the dark-mode preference. Independent of the snapshot
    /// lifecycle; survives logout.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.cache.save_dark_mode(enabled)
    }

    /// Stops the session observer and releases the context.
    pub async fn shutdown(self) {
        self.session.stop().await;
    }
}
