//! Session lifecycle: PIN login, restore on cold start, logout.

pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::SessionStore;
