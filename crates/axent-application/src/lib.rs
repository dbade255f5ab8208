//! Application layer: wires the state core, infrastructure and the
//! assistant client into long-lived services.
//!
//! [`AppContext`] is the single composition root; everything else hangs
//! off it by `Arc`.

pub mod app_context;
pub mod chat_service;
pub mod roadmap_service;
pub mod session_observer;

pub use app_context::AppContext;
pub use chat_service::ChatService;
pub use roadmap_service::{RoadmapError, RoadmapOutcome, RoadmapService};
pub use session_observer::SessionObserver;

/// Installs the global tracing subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
