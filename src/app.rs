//! Wires the stores, repositories and services together from configuration.

use std::sync::Arc;

use tracing::info;

use nextsteps_auth::{RbacEnforcer, SessionManager, SessionStore};
use nextsteps_cache::LocalStorageManager;
use nextsteps_core::config::AppConfig;
use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::{BlobStore, DocumentStore, KeyValueStore, Notifier};
use nextsteps_database::repositories::{InvitationRepository, StaffRepository, TaskRepository};
use nextsteps_service::{
    ActorContext, DepartmentCatalog, InvitationService, StaffService, TaskService,
};
use nextsteps_storage::BlobStorage;

/// Every service the front end talks to, built over one set of stores.
#[derive(Debug)]
pub struct App {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Login state.
    pub session: SessionManager,
    /// Task board.
    pub tasks: TaskService,
    /// Colleague management.
    pub staff: StaffService,
    /// Setup links.
    pub invitations: InvitationService,
}

impl App {
    /// Open the configured stores and build the services over them.
    pub async fn build(config: AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let documents = nextsteps_database::connect(&config.database).await?;
        let local: Arc<dyn KeyValueStore> = Arc::new(LocalStorageManager::new(&config.local)?);
        let blobs = BlobStorage::from_config(&config.storage).await?;
        if !blobs.health_check().await? {
            return Err(AppError::service_unavailable("Blob storage is not reachable"));
        }

        info!(
            documents = documents.provider_type(),
            local = local.provider_type(),
            "Stores ready"
        );
        Ok(Self::with_stores(config, documents, local, blobs.provider(), notifier))
    }

    /// Build the services over already-open stores.
    pub fn with_stores(
        config: AppConfig,
        documents: Arc<dyn DocumentStore>,
        local: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let staff_repo = StaffRepository::new(documents.clone());
        let catalog = DepartmentCatalog::from_config(&config.tasks);
        let rbac = RbacEnforcer::new();

        let session = SessionManager::new(
            staff_repo.clone(),
            SessionStore::new(local, &config.session),
            notifier,
            config.session.clone(),
        );
        let tasks = TaskService::new(
            TaskRepository::new(documents.clone()),
            blobs,
            rbac.clone(),
            config.tasks.clone(),
        );
        let staff = StaffService::new(staff_repo.clone(), rbac.clone(), catalog.clone());
        let invitations = InvitationService::new(
            InvitationRepository::new(documents),
            staff_repo,
            rbac,
            catalog,
            config.invitation.clone(),
        );

        Self {
            config,
            session,
            tasks,
            staff,
            invitations,
        }
    }

    /// Restore the cached session and return the acting colleague.
    pub async fn actor(&self) -> AppResult<ActorContext> {
        self.session.restore().await;
        ActorContext::from_session(&self.session)
    }
}
