//! Blob storage construction from configuration.

use std::sync::Arc;

use tracing::info;

use nextsteps_core::config::StorageConfig;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::BlobStore;

/// Entry point for building the configured blob store.
#[derive(Debug, Clone)]
pub struct BlobStorage {
    inner: Arc<dyn BlobStore>,
}

impl BlobStorage {
    /// Build the local filesystem store described by `config`.
    #[cfg(feature = "local")]
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        info!(root = %config.root_path, base_url = %config.public_base_url, "Initializing local blob storage");
        let provider = crate::providers::LocalBlobStore::new(config).await?;
        Ok(Self {
            inner: Arc::new(provider),
        })
    }

    /// Wrap an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn BlobStore>) -> Self {
        Self { inner: provider }
    }

    /// The shared provider handle.
    pub fn provider(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.inner)
    }

    /// Check the provider is reachable, logging the outcome.
    pub async fn health_check(&self) -> AppResult<bool> {
        let healthy = self.inner.health_check().await?;
        info!(provider = self.inner.provider_type(), healthy, "Blob storage health check");
        Ok(healthy)
    }
}
