//! Document store construction from configuration.

use std::sync::Arc;

use tracing::info;

use nextsteps_core::config::DatabaseConfig;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::DocumentStore;

use crate::memory::MemoryDocumentStore;

/// Open the document store described by the configuration.
///
/// An empty `snapshot_path` yields a purely in-memory store; otherwise the
/// store is loaded from and persisted to that JSON file.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    let store = if config.snapshot_path.is_empty() {
        info!("Opening in-memory document store");
        MemoryDocumentStore::new(config.change_buffer)
    } else {
        info!(path = %config.snapshot_path, "Opening persistent document store");
        MemoryDocumentStore::open(&config.snapshot_path, config.change_buffer).await?
    };
    Ok(Arc::new(store))
}
