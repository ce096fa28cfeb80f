//! In-memory blob store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use url::Url;

use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::{BlobHandle, BlobStore};

use crate::path;

/// Blob store keeping objects in process memory.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<DashMap<String, Bytes>>,
    public_base: Url,
}

impl MemoryBlobStore {
    /// Create an empty store publishing objects under `public_base_url`.
    pub fn new(public_base_url: &str) -> AppResult<Self> {
        Ok(Self {
            objects: Arc::new(DashMap::new()),
            public_base: path::parse_base_url(public_base_url)?,
        })
    }

    /// Paths of every stored object, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, object_path: &str, data: Bytes) -> AppResult<BlobHandle> {
        let clean = path::normalize(object_path)?;
        let size_bytes = data.len() as u64;
        self.objects.insert(clean.clone(), data);
        Ok(BlobHandle {
            path: clean,
            size_bytes,
        })
    }

    async fn public_url(&self, handle: &BlobHandle) -> AppResult<String> {
        path::public_url(&self.public_base, &handle.path)
    }

    async fn read_bytes(&self, object_path: &str) -> AppResult<Bytes> {
        let clean = path::normalize(object_path)?;
        self.objects
            .get(&clean)
            .map(|e| e.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {clean}")))
    }

    async fn delete(&self, object_path: &str) -> AppResult<()> {
        let clean = path::normalize(object_path)?;
        self.objects.remove(&clean);
        Ok(())
    }
}
