//! Keys the application writes to local storage.
//!
//! Keeping every key here makes it easy to find what the device holds.

/// Serialized login session (`{"staff": {...}, "loginTime": <ms>}`).
pub const LOGGED_IN_STAFF: &str = "loggedInStaff";

/// Every key the application may write, for diagnostics and cleanup.
pub const ALL: &[&str] = &[LOGGED_IN_STAFF];

/// Whether `key` is one the application writes.
pub fn is_known(key: &str) -> bool {
    ALL.contains(&key)
}
