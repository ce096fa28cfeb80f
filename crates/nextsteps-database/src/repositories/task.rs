//! Task repository implementation.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use nextsteps_core::result::AppResult;
use nextsteps_core::traits::{DocumentStore, Subscription};
use nextsteps_core::types::document::to_fields;
use nextsteps_core::types::{Document, Fields, Filter};
use nextsteps_entity::collections;
use nextsteps_entity::task::{NewTask, Task};

use super::decode_all;

/// Repository for task board entries.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    store: Arc<dyn DocumentStore>,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a task by document id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Task>> {
        match self.store.get(collections::TASKS, id).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    /// List every task, open and completed.
    pub async fn find_all(&self) -> AppResult<Vec<Task>> {
        let docs = self.store.query(collections::TASKS, &Filter::all()).await?;
        Ok(Self::decode(&docs))
    }

    /// List tasks flagged as completed.
    pub async fn find_completed(&self) -> AppResult<Vec<Task>> {
        let docs = self
            .store
            .query(collections::TASKS, &Filter::eq("completed", true))
            .await?;
        Ok(Self::decode(&docs))
    }

    /// Insert a new open task and return its id.
    pub async fn create(&self, data: &NewTask, image_url: Option<&str>) -> AppResult<String> {
        let mut fields = to_fields(data)?;
        fields.insert("imageUrl".into(), Value::from(image_url.unwrap_or_default()));
        fields.insert("completed".into(), Value::Bool(false));
        fields.insert("createdAt".into(), self.store.server_timestamp());

        let id = self.store.insert(collections::TASKS, fields).await?;
        debug!(task_id = %id, department = %data.department, "Created task");
        Ok(id)
    }

    /// Flag a task as completed, stamping the completion time.
    pub async fn mark_completed(&self, id: &str) -> AppResult<()> {
        let mut fields = Fields::new();
        fields.insert("completed".into(), Value::Bool(true));
        fields.insert("completedAt".into(), self.store.server_timestamp());
        self.store.update(collections::TASKS, id, fields).await
    }

    /// Return a completed task to the open list.
    pub async fn mark_open(&self, id: &str) -> AppResult<()> {
        let mut fields = Fields::new();
        fields.insert("completed".into(), Value::Bool(false));
        fields.insert("completedAt".into(), Value::Null);
        self.store.update(collections::TASKS, id, fields).await
    }

    /// Live query over the whole task collection.
    pub async fn subscribe_all(&self) -> AppResult<Subscription> {
        self.store.subscribe(collections::TASKS, Filter::all()).await
    }

    /// Decode a task snapshot, dropping malformed entries.
    pub fn decode(docs: &[Document]) -> Vec<Task> {
        decode_all(collections::TASKS, docs)
    }
}
