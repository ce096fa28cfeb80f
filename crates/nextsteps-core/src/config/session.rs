//! Session persistence configuration.

use serde::{Deserialize, Serialize};

/// Session persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hours after login before a cached session is discarded on restore.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Local storage key holding the serialized session.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl SessionConfig {
    /// The session time-to-live in milliseconds.
    pub fn ttl_millis(&self) -> i64 {
        (self.ttl_hours as i64) * 60 * 60 * 1000
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    3
}

fn default_storage_key() -> String {
    "loggedInStaff".to_string()
}
