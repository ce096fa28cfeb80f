//! In-process [`DocumentStore`] backed by a lock-protected map.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use uuid::Uuid;

use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::document_store::{DocumentStore, Subscription};
use nextsteps_core::types::document::resolve_server_timestamps;
use nextsteps_core::types::{Document, Fields, Filter};

use super::snapshot::{self, Collections};

/// Document store living in process memory, optionally mirrored to a JSON
/// snapshot file after every write.
///
/// Writers are serialized by a single lock, so `create` is an atomic
/// check-and-set. Every committed write broadcasts the collection name to
/// live subscriptions, which then re-run their query.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Collection name → documents in insertion order.
    collections: RwLock<Collections>,
    /// Change feed carrying the name of the collection that changed.
    changes: broadcast::Sender<String>,
    /// Snapshot file, if persistence is enabled.
    snapshot_path: Option<PathBuf>,
}

/// Iteration state of a live query stream.
struct LiveQuery {
    store: MemoryDocumentStore,
    collection: String,
    filter: Filter,
    changes: broadcast::Receiver<String>,
    primed: bool,
}

impl MemoryDocumentStore {
    /// Create an empty, purely in-memory store.
    pub fn new(change_buffer: usize) -> Self {
        Self::with_collections(Collections::new(), None, change_buffer)
    }

    /// Open a store persisted at `path`, loading existing contents.
    pub async fn open(path: impl Into<PathBuf>, change_buffer: usize) -> AppResult<Self> {
        let path = path.into();
        let collections = snapshot::load(&path).await?;
        debug!(
            path = %path.display(),
            collections = collections.len(),
            "Loaded document snapshot"
        );
        Ok(Self::with_collections(
            collections,
            Some(path),
            change_buffer,
        ))
    }

    fn with_collections(
        collections: Collections,
        snapshot_path: Option<PathBuf>,
        change_buffer: usize,
    ) -> Self {
        let (changes, _) = broadcast::channel(change_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(collections),
                changes,
                snapshot_path,
            }),
        }
    }

    /// Apply a mutation under the write lock, persist, then notify
    /// subscribers of the collection.
    ///
    /// The mutation runs on a copy of the collection. If the snapshot
    /// cannot be saved the previous contents are put back, so a failed
    /// write leaves nothing behind.
    async fn write<T>(
        &self,
        collection: &str,
        mutate: impl FnOnce(&mut Vec<Document>) -> AppResult<T>,
    ) -> AppResult<T> {
        let result = {
            let mut collections = self.inner.collections.write().await;
            let mut staged = collections.get(collection).cloned().unwrap_or_default();
            let result = mutate(&mut staged)?;
            let previous = collections.insert(collection.to_string(), staged);

            if let Some(path) = &self.inner.snapshot_path {
                if let Err(e) = snapshot::save(path, &collections).await {
                    match previous {
                        Some(docs) => collections.insert(collection.to_string(), docs),
                        None => collections.remove(collection),
                    };
                    warn!(collection, error = %e, "Snapshot save failed; write rolled back");
                    return Err(e);
                }
            }
            result
        };

        // No receivers is fine: nobody is watching.
        let _ = self.inner.changes.send(collection.to_string());
        Ok(result)
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: &str, filter: Filter) -> AppResult<Subscription> {
        // Subscribe before the first query so no change can slip between them.
        let state = LiveQuery {
            store: self.clone(),
            collection: collection.to_string(),
            filter,
            changes: self.inner.changes.subscribe(),
            primed: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            if state.primed {
                loop {
                    match state.changes.recv().await {
                        Ok(changed) if changed == state.collection => break,
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Snapshots replace each other, so missed
                            // notifications only cost one re-query.
                            debug!(skipped, collection = %state.collection, "Live query lagged");
                            break;
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
            state.primed = true;
            let snapshot = state.store.query(&state.collection, &state.filter).await;
            Some((snapshot, state))
        });

        Ok(Subscription::new(Box::pin(stream)))
    }

    async fn insert(&self, collection: &str, mut fields: Fields) -> AppResult<String> {
        resolve_server_timestamps(&mut fields, Self::now_millis());
        let id = Self::generate_id();
        let doc = Document::new(id.clone(), fields);
        self.write(collection, move |docs| {
            docs.push(doc);
            Ok(())
        })
        .await?;
        debug!(collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn set_at(&self, collection: &str, id: &str, mut fields: Fields) -> AppResult<()> {
        resolve_server_timestamps(&mut fields, Self::now_millis());
        let doc = Document::new(id, fields);
        self.write(collection, move |docs| {
            match docs.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc,
                None => docs.push(doc),
            }
            Ok(())
        })
        .await
    }

    async fn create(&self, collection: &str, id: &str, mut fields: Fields) -> AppResult<()> {
        resolve_server_timestamps(&mut fields, Self::now_millis());
        let doc = Document::new(id, fields);
        self.write(collection, move |docs| {
            if docs.iter().any(|d| d.id == doc.id) {
                return Err(AppError::conflict(format!(
                    "Document '{}' already exists in '{collection}'",
                    doc.id
                )));
            }
            docs.push(doc);
            Ok(())
        })
        .await
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> AppResult<()> {
        resolve_server_timestamps(&mut fields, Self::now_millis());
        self.write(collection, move |docs| {
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| AppError::not_found(format!("No document '{id}' in '{collection}'")))?;
            doc.fields.extend(fields);
            Ok(())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let removed = self
            .write(collection, |docs| {
                let before = docs.len();
                docs.retain(|d| d.id != id);
                Ok(before != docs.len())
            })
            .await?;
        if !removed {
            warn!(collection, id, "Delete of missing document ignored");
        }
        Ok(())
    }
}
