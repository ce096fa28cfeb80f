//! Blob store trait for uploaded task images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Handle to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlobHandle {
    /// Path within the blob store.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Trait for object storage backends.
///
/// The trait is defined here in `nextsteps-core` and implemented in
/// `nextsteps-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Upload bytes to the given path, replacing any existing object.
    async fn upload(&self, path: &str, data: Bytes) -> AppResult<BlobHandle>;

    /// Resolve the public URL of an uploaded object.
    async fn public_url(&self, handle: &BlobHandle) -> AppResult<String>;

    /// Read an object back into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Delete an object.
    async fn delete(&self, path: &str) -> AppResult<()>;
}
