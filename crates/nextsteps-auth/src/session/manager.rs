//! Session lifecycle manager: restore, PIN login, logout.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use nextsteps_core::config::SessionConfig;
use nextsteps_core::traits::{Notice, Notifier};
use nextsteps_database::repositories::StaffRepository;
use nextsteps_entity::session::PersistedSession;
use nextsteps_entity::staff::Staff;

use super::store::SessionStore;

/// Title of the notice raised when a cached session has expired.
pub const SESSION_EXPIRED_TITLE: &str = "Session expired";
/// Body of the notice raised when a cached session has expired.
pub const SESSION_EXPIRED_BODY: &str = "Please log in again.";

/// Owns the authenticated colleague for the lifetime of the process.
///
/// The identity is held in a watch channel so front ends can react to
/// every change. No error crosses this boundary: backend failures are
/// logged and reported as "not logged in".
pub struct SessionManager {
    /// Staff lookups for PIN login.
    staff_repo: StaffRepository,
    /// Device-local session persistence.
    store: SessionStore,
    /// Sink for user-visible notices.
    notifier: Arc<dyn Notifier>,
    /// Session configuration.
    config: SessionConfig,
    /// Current identity.
    identity: watch::Sender<Option<Staff>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("logged_in", &self.identity.borrow().is_some())
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager with no identity.
    pub fn new(
        staff_repo: StaffRepository,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
        config: SessionConfig,
    ) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            staff_repo,
            store,
            notifier,
            config,
            identity,
        }
    }

    /// Restores the cached session on cold start.
    ///
    /// A session older than the TTL is deleted and the user is told to log
    /// in again. A fresh one is trusted as-is, without re-reading the staff
    /// record. Anything unreadable counts as no session.
    pub async fn restore(&self) -> Option<Staff> {
        let session = match self.store.load().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.set_identity(None);
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cached session");
                self.set_identity(None);
                return None;
            }
        };

        let now = Utc::now().timestamp_millis();
        let ttl = self.config.ttl_millis();
        if session.is_expired(now, ttl) {
            info!(
                staff_id = %session.staff.id,
                age_ms = session.age_millis(now),
                "Cached session expired"
            );
            if let Err(e) = self.store.clear().await {
                warn!(error = %e, "Failed to delete expired session");
            }
            self.set_identity(None);
            self.notifier
                .notify(Notice::info(SESSION_EXPIRED_TITLE, SESSION_EXPIRED_BODY));
            return None;
        }

        info!(staff_id = %session.staff.id, "Session restored");
        self.set_identity(Some(session.staff.clone()));
        Some(session.staff)
    }

    /// Attempts a PIN login.
    ///
    /// Returns `true` once the matching colleague is both persisted and set
    /// as the current identity. Unknown or malformed PINs and backend
    /// failures return `false` and leave every piece of state unchanged.
    pub async fn login(&self, pin: &str) -> bool {
        let mut matches = match self.staff_repo.find_by_pin(pin).await {
            Ok(matches) => matches,
            Err(e) => {
                error!(error = %e, "Staff lookup failed during login");
                return false;
            }
        };

        if matches.is_empty() {
            info!("Login rejected: no colleague with that PIN");
            return false;
        }
        if matches.len() > 1 {
            warn!(
                count = matches.len(),
                ids = ?matches.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
                "Multiple colleagues share a PIN; using the first"
            );
        }
        let staff = matches.swap_remove(0);

        let session = PersistedSession::new(staff, Utc::now().timestamp_millis());
        if let Err(e) = self.store.save(&session).await {
            error!(error = %e, "Failed to persist session");
            return false;
        }

        info!(staff_id = %session.staff.id, role = %session.staff.role, "Logged in");
        self.set_identity(Some(session.staff));
        true
    }

    /// Clears the identity and the cached session. Always succeeds.
    pub async fn logout(&self) {
        if let Some(staff) = self.current_identity() {
            info!(staff_id = %staff.id, "Logged out");
        }
        self.set_identity(None);
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to delete cached session");
        }
    }

    /// The authenticated colleague, if any.
    pub fn current_identity(&self) -> Option<Staff> {
        self.identity.borrow().clone()
    }

    /// Observes every identity change.
    pub fn watch_identity(&self) -> watch::Receiver<Option<Staff>> {
        self.identity.subscribe()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn set_identity(&self, staff: Option<Staff>) {
        self.identity.send_replace(staff);
    }
}
