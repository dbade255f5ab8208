//! Infrastructure layer for Axent.
//!
//! File-backed snapshot cache, HTTP document store, session sources and
//! the startup-resolved backend mode. Everything here implements the
//! boundary traits defined in `axent-core`.

pub mod backend;
pub mod config;
pub mod local_session;
pub mod paths;
pub mod remote;
pub mod snapshot_cache;
pub mod storage;

pub use crate::backend::{resolve_backend, BackendMode, PersistenceBackend};
pub use crate::config::AxentConfig;
pub use crate::local_session::LocalSessionSource;
pub use crate::remote::{HttpDocumentStore, HttpSessionSource};
pub use crate::snapshot_cache::FileSnapshotCache;
