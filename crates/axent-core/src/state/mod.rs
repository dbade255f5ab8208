//! Application state: the root aggregate, its mutation layer, the cache
//! boundary and the owning store.

pub mod cache;
pub mod model;
pub mod store;

pub use cache::SnapshotCache;
pub use model::AppState;
pub use store::{AppStateStore, USERS_COLLECTION};
