//! Local persistent key-value storage trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the device-local key-value store that survives restarts.
///
/// Values are opaque strings (JSON in practice). The core only ever
/// touches the session key, but providers are general purpose.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "file", "memory").
    fn provider_type(&self) -> &str;

    /// Get a value by key. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Check whether a key is present.
    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
