//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use url::Url;

use nextsteps_core::config::StorageConfig;
use nextsteps_core::error::{AppError, ErrorKind};
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::{BlobHandle, BlobStore};

use crate::path;

/// Blob store writing objects under a root directory and serving them
/// from a configured public base URL.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Base URL the root directory is published under.
    public_base: Url,
    /// Largest accepted upload.
    max_upload_bytes: u64,
}

impl LocalBlobStore {
    /// Create a new local blob store, creating the root directory.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base: path::parse_base_url(&config.public_base_url)?,
            max_upload_bytes: config.max_upload_size_bytes,
        })
    }

    /// Resolve a relative object path to a filesystem path within the root.
    fn resolve(&self, object_path: &str) -> AppResult<(String, PathBuf)> {
        let clean = path::normalize(object_path)?;
        let full = self.root.join(&clean);
        Ok((clean, full))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn upload(&self, object_path: &str, data: Bytes) -> AppResult<BlobHandle> {
        if data.len() as u64 > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "Upload of {} bytes exceeds the {} byte limit",
                data.len(),
                self.max_upload_bytes
            )));
        }

        let (clean, full_path) = self.resolve(object_path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {clean}"),
                e,
            )
        })?;

        debug!(path = %clean, bytes = data.len(), "Uploaded blob");
        Ok(BlobHandle {
            path: clean,
            size_bytes: data.len() as u64,
        })
    }

    async fn public_url(&self, handle: &BlobHandle) -> AppResult<String> {
        path::public_url(&self.public_base, &handle.path)
    }

    async fn read_bytes(&self, object_path: &str) -> AppResult<Bytes> {
        let (clean, full_path) = self.resolve(object_path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {clean}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {clean}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, object_path: &str) -> AppResult<()> {
        let (clean, full_path) = self.resolve(object_path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {clean}"),
                e,
            )),
        }
    }
}
