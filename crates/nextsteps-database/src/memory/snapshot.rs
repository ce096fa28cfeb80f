//! JSON snapshot persistence for the in-process document store.

use std::collections::BTreeMap;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use nextsteps_core::error::{AppError, ErrorKind};
use nextsteps_core::result::AppResult;
use nextsteps_core::types::Document;

/// All collections, each in store order.
pub type Collections = BTreeMap<String, Vec<Document>>;

/// Load collections from a snapshot file. A missing file is an empty store.
pub async fn load(path: &Path) -> AppResult<Collections> {
    match fs::read(path).await {
        Ok(bytes) if bytes.is_empty() => Ok(Collections::new()),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Corrupt document snapshot: {}", path.display()),
                e,
            )
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collections::new()),
        Err(e) => Err(AppError::with_source(
            ErrorKind::Database,
            format!("Failed to read document snapshot: {}", path.display()),
            e,
        )),
    }
}

/// Write collections to a snapshot file via a temporary sibling file, so a
/// crash never leaves a half-written snapshot behind.
pub async fn save(path: &Path, collections: &Collections) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to create snapshot directory: {}", parent.display()),
                e,
            )
        })?;
    }

    let bytes = serde_json::to_vec_pretty(collections)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to write document snapshot", e)
    })?;
    fs::rename(&tmp, path).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to replace document snapshot", e)
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Saved document snapshot");
    Ok(())
}
