//! Session persistence in device-local key-value storage.

use std::sync::Arc;

use tracing::warn;

use nextsteps_core::config::SessionConfig;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::KeyValueStore;
use nextsteps_entity::session::PersistedSession;

/// Reads and writes the serialized session under a single storage key.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Device-local storage.
    storage: Arc<dyn KeyValueStore>,
    /// Key holding the serialized session.
    key: String,
}

impl SessionStore {
    /// Creates a session store using the configured storage key.
    pub fn new(storage: Arc<dyn KeyValueStore>, config: &SessionConfig) -> Self {
        Self {
            storage,
            key: config.storage_key.clone(),
        }
    }

    /// The storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the cached session.
    ///
    /// Returns `Ok(None)` both when nothing is stored and when the stored
    /// value cannot be parsed; only storage failures are errors.
    pub async fn load(&self) -> AppResult<Option<PersistedSession>> {
        let Some(raw) = self.storage.get(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring malformed cached session");
                Ok(None)
            }
        }
    }

    /// Persists a session, replacing any previous one.
    pub async fn save(&self, session: &PersistedSession) -> AppResult<()> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(&self.key, &raw).await
    }

    /// Deletes the cached session. Deleting nothing is fine.
    pub async fn clear(&self) -> AppResult<()> {
        self.storage.remove(&self.key).await
    }
}
