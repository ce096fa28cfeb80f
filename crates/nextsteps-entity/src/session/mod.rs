//! Device-local session entities.

pub mod model;

pub use model::PersistedSession;
