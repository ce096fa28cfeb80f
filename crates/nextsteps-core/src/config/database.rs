//! Document store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the in-process document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the JSON snapshot file. An empty string keeps the store
    /// purely in memory.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Buffer size of the change-notification channel backing live queries.
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            change_buffer: default_change_buffer(),
        }
    }
}

fn default_snapshot_path() -> String {
    "./data/store.json".to_string()
}

fn default_change_buffer() -> usize {
    64
}
