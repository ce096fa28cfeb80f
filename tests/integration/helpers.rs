//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use nextsteps_auth::{RbacEnforcer, SessionManager, SessionStore};
use nextsteps_cache::memory::MemoryKeyValueStore;
use nextsteps_core::config::AppConfig;
use nextsteps_core::traits::{DocumentStore, KeyValueStore, MemoryNotifier, Notifier};
use nextsteps_database::MemoryDocumentStore;
use nextsteps_database::repositories::{InvitationRepository, StaffRepository, TaskRepository};
use nextsteps_entity::session::PersistedSession;
use nextsteps_entity::staff::{NewStaff, Staff, StaffRole};
use nextsteps_service::{
    ActorContext, DepartmentCatalog, InvitationService, StaffService, TaskService,
};
use nextsteps_storage::providers::MemoryBlobStore;

/// Test application context: every service over in-memory stores.
pub struct TestApp {
    /// Shared document store
    pub documents: MemoryDocumentStore,
    /// Device-local storage, survives `restart`
    pub local: MemoryKeyValueStore,
    /// Uploaded task photos
    pub blobs: MemoryBlobStore,
    /// Notices raised by the session manager
    pub notices: Arc<MemoryNotifier>,
    /// Application config
    pub config: AppConfig,
    /// Login state
    pub session: SessionManager,
    /// Task board
    pub tasks: TaskService,
    /// Colleague management
    pub staff: StaffService,
    /// Setup links
    pub invitations: InvitationService,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let documents = MemoryDocumentStore::new(64);
        let local = MemoryKeyValueStore::new();
        let blobs = MemoryBlobStore::new(&config.storage.public_base_url)
            .expect("Failed to init blob store");
        let notices = Arc::new(MemoryNotifier::new());

        let store: Arc<dyn DocumentStore> = Arc::new(documents.clone());
        let staff_repo = StaffRepository::new(store.clone());
        let catalog = DepartmentCatalog::from_config(&config.tasks);
        let rbac = RbacEnforcer::new();

        let session = session_manager(&config, &store, &local, &notices);
        let tasks = TaskService::new(
            TaskRepository::new(store.clone()),
            Arc::new(blobs.clone()),
            rbac.clone(),
            config.tasks.clone(),
        );
        let staff = StaffService::new(staff_repo.clone(), rbac.clone(), catalog.clone());
        let invitations = InvitationService::new(
            InvitationRepository::new(store),
            staff_repo,
            rbac,
            catalog,
            config.invitation.clone(),
        );

        Self {
            documents,
            local,
            blobs,
            notices,
            config,
            session,
            tasks,
            staff,
            invitations,
        }
    }

    /// A fresh session manager over the same local storage, as after an
    /// app restart.
    pub fn restart(&self) -> SessionManager {
        let store: Arc<dyn DocumentStore> = Arc::new(self.documents.clone());
        session_manager(&self.config, &store, &self.local, &self.notices)
    }

    /// Create the first manager
    pub async fn create_manager(&self, name: &str, pin: &str) -> Staff {
        self.staff
            .bootstrap_manager(new_staff(name, &["Grocery"], pin))
            .await
            .expect("Failed to bootstrap manager")
    }

    /// Create a regular colleague, added by `manager`
    pub async fn create_staff(
        &self,
        manager: &Staff,
        name: &str,
        departments: &[&str],
        pin: &str,
    ) -> Staff {
        self.staff
            .add_colleague(
                &ActorContext::new(manager.clone()),
                new_staff(name, departments, pin),
            )
            .await
            .expect("Failed to add colleague")
    }

    /// Log in and return the acting context
    pub async fn login(&self, pin: &str) -> ActorContext {
        assert!(self.session.login(pin).await, "login with {pin} failed");
        ActorContext::from_session(&self.session).expect("logged in")
    }

    /// Write a cached session that logged in `age` ago
    pub async fn seed_session(&self, staff: &Staff, age: Duration) {
        let session = PersistedSession::new(
            staff.clone(),
            (Utc::now() - age).timestamp_millis(),
        );
        self.local
            .set(
                &self.config.session.storage_key,
                &serde_json::to_string(&session).expect("serialize session"),
            )
            .await
            .expect("Failed to seed session");
    }
}

/// Data for a regular colleague
pub fn new_staff(name: &str, departments: &[&str], pin: &str) -> NewStaff {
    NewStaff {
        name: name.to_string(),
        departments: departments.iter().map(|d| d.to_string()).collect(),
        pin: pin.to_string(),
        role: StaffRole::Staff,
    }
}

fn session_manager(
    config: &AppConfig,
    store: &Arc<dyn DocumentStore>,
    local: &MemoryKeyValueStore,
    notices: &Arc<MemoryNotifier>,
) -> SessionManager {
    let local: Arc<dyn KeyValueStore> = Arc::new(local.clone());
    let notifier: Arc<dyn Notifier> = notices.clone();
    SessionManager::new(
        StaffRepository::new(store.clone()),
        SessionStore::new(local, &config.session),
        notifier,
        config.session.clone(),
    )
}
