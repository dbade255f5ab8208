//! Axent state core: domain models, the application state store, and the
//! boundary traits implemented by the infrastructure layer.
//!
//! The store owns the single `AppState` aggregate, persists every
//! committed snapshot to the local cache before anything else, and
//! opportunistically mirrors it to a remote document store when one is
//! configured. The rest of the system consumes the store through an
//! explicit context object, never a global.

pub mod assistant;
pub mod chat;
pub mod error;
pub mod journal;
pub mod planner;
pub mod state;
pub mod sync;
pub mod user;

// Re-export common error type
pub use error::AxentError;
