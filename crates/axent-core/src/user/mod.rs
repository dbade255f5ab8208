//! Learner profile domain models.

pub mod model;

pub use model::{EnergyPreference, User, UserIdentity};
