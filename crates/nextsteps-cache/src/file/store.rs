//! Key-value store persisted as a single JSON object on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use nextsteps_core::error::{AppError, ErrorKind};
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::KeyValueStore;

use crate::keys;

type Entries = BTreeMap<String, String>;

/// File-backed key-value provider.
///
/// The file is read on every access and rewritten (via a temporary
/// sibling) on every change, so separate processes sharing the file see
/// each other's writes once they complete.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a provider backed by `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> AppResult<Entries> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Cache,
                    format!("Failed to read local storage: {}", self.path.display()),
                    e,
                ));
            }
        };
        if bytes.is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable local storage");
                Ok(Entries::new())
            }
        }
    }

    async fn write_entries(&self, entries: &Entries) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Cache,
                    format!("Failed to create local storage directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Failed to write local storage", e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to replace local storage", e)
        })?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    fn provider_type(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await?;
        if !keys::is_known(key) {
            warn!(key, "Stored a key not listed in keys::ALL");
        }
        debug!(key, "Stored local value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
            debug!(key, "Removed local value");
        }
        Ok(())
    }
}
