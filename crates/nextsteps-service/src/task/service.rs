//! Task board operations.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use validator::Validate;

use nextsteps_auth::{Capability, RbacEnforcer};
use nextsteps_core::config::TasksConfig;
use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::BlobStore;
use nextsteps_database::repositories::TaskRepository;
use nextsteps_entity::task::{NewTask, Task};

use crate::catalog::DepartmentCatalog;
use crate::context::ActorContext;

use super::feed::TaskFeed;
use super::visibility::{ViewToggle, VisibleTasks, open_tasks, visible_tasks};

/// Creates, completes and lists tasks.
#[derive(Debug, Clone)]
pub struct TaskService {
    /// Task repository.
    repo: TaskRepository,
    /// Storage for task photos.
    blobs: Arc<dyn BlobStore>,
    /// Capability checks.
    rbac: RbacEnforcer,
    /// Departments a task may belong to.
    catalog: DepartmentCatalog,
    /// Task board configuration.
    config: TasksConfig,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(
        repo: TaskRepository,
        blobs: Arc<dyn BlobStore>,
        rbac: RbacEnforcer,
        config: TasksConfig,
    ) -> Self {
        Self {
            repo,
            blobs,
            rbac,
            catalog: DepartmentCatalog::from_config(&config),
            config,
        }
    }

    /// Creates a task, uploading its photo first when one is attached.
    ///
    /// Title and department are checked before any store call.
    pub async fn create_task(
        &self,
        ctx: &ActorContext,
        data: NewTask,
        image: Option<Bytes>,
    ) -> AppResult<Task> {
        self.rbac.require(&ctx.staff, Capability::TaskCreate)?;
        data.validate()?;
        self.catalog.validate(&data.department)?;

        let image_url = match image {
            Some(bytes) => Some(self.upload_image(bytes).await?),
            None => None,
        };

        let id = self.repo.create(&data, image_url.as_deref()).await?;
        info!(
            task_id = %id,
            created_by = %ctx.staff_id(),
            department = %data.department,
            has_image = image_url.is_some(),
            "Task created"
        );

        self.get_task(&id).await
    }

    /// Fetches a single task.
    pub async fn get_task(&self, id: &str) -> AppResult<Task> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))
    }

    /// Marks a task as completed.
    pub async fn complete_task(&self, ctx: &ActorContext, id: &str) -> AppResult<()> {
        self.rbac.require(&ctx.staff, Capability::TaskComplete)?;
        self.repo
            .mark_completed(id)
            .await
            .map_err(|e| not_found_as_task(e, id))?;
        info!(task_id = %id, completed_by = %ctx.staff_id(), "Task completed");
        Ok(())
    }

    /// Returns a completed task to the open list.
    pub async fn undo_complete(&self, ctx: &ActorContext, id: &str) -> AppResult<()> {
        self.rbac.require(&ctx.staff, Capability::TaskUndoComplete)?;
        self.repo
            .mark_open(id)
            .await
            .map_err(|e| not_found_as_task(e, id))?;
        info!(task_id = %id, reopened_by = %ctx.staff_id(), "Task completion undone");
        Ok(())
    }

    /// Tasks completed within the retention window, newest first.
    pub async fn recently_completed(&self, ctx: &ActorContext) -> AppResult<Vec<Task>> {
        self.rbac.require(&ctx.staff, Capability::TaskViewCompleted)?;

        let since = (Utc::now()
            - Duration::days(i64::from(self.config.completed_retention_days)))
        .timestamp_millis();

        let mut tasks: Vec<Task> = self
            .repo
            .find_completed()
            .await?
            .into_iter()
            .filter(|t| t.completed_since(since))
            .collect();
        tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(tasks)
    }

    /// One-shot read of the open tasks visible to the actor.
    pub async fn visible_open_tasks(
        &self,
        ctx: &ActorContext,
        toggle: ViewToggle,
    ) -> AppResult<VisibleTasks> {
        let open = open_tasks(self.repo.find_all().await?);
        Ok(visible_tasks(&open, &ctx.staff, toggle))
    }

    /// Opens a live feed of the open tasks visible to the actor.
    pub async fn open_feed(&self, ctx: &ActorContext, toggle: ViewToggle) -> AppResult<TaskFeed> {
        TaskFeed::open(self.repo.clone(), ctx.staff.clone(), toggle).await
    }

    /// The departments tasks may belong to.
    pub fn departments(&self) -> &[String] {
        self.catalog.all()
    }

    async fn upload_image(&self, bytes: Bytes) -> AppResult<String> {
        let path = format!(
            "{}/{}.jpg",
            self.config.image_prefix.trim_end_matches('/'),
            Utc::now().timestamp_millis()
        );
        let handle = self.blobs.upload(&path, bytes).await.inspect_err(|e| {
            warn!(path = %path, error = %e, "Task image upload failed");
        })?;
        self.blobs.public_url(&handle).await
    }
}

fn not_found_as_task(err: AppError, id: &str) -> AppError {
    if err.is_not_found() {
        AppError::not_found(format!("Task {id} not found"))
    } else {
        err
    }
}
