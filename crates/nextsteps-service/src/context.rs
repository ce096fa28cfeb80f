//! Context carrying the colleague on whose behalf a service call runs.

use chrono::{DateTime, Utc};

use nextsteps_auth::SessionManager;
use nextsteps_core::error::AppError;
use nextsteps_entity::staff::Staff;

/// The acting colleague for a service call.
///
/// Built from the session manager's current identity so that every
/// operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct ActorContext {
    /// The logged-in colleague.
    pub staff: Staff,
    /// When the action was initiated.
    pub request_time: DateTime<Utc>,
}

impl ActorContext {
    /// Creates a context for the given colleague.
    pub fn new(staff: Staff) -> Self {
        Self {
            staff,
            request_time: Utc::now(),
        }
    }

    /// Builds a context from the current session, failing when nobody is
    /// logged in.
    pub fn from_session(session: &SessionManager) -> Result<Self, AppError> {
        session
            .current_identity()
            .map(Self::new)
            .ok_or_else(|| AppError::authentication("Not logged in"))
    }

    /// The acting colleague's id.
    pub fn staff_id(&self) -> &str {
        &self.staff.id
    }

    /// Returns whether the acting colleague is a manager.
    pub fn is_manager(&self) -> bool {
        self.staff.is_manager()
    }
}
