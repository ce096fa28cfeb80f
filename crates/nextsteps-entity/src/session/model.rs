//! Persisted login session.

use serde::{Deserialize, Serialize};

use crate::staff::Staff;

/// The locally cached proof of a successful login.
///
/// Serialized as `{"staff": {...}, "loginTime": <epoch ms>}`. The staff
/// snapshot is trusted as-is on restore and never re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Staff record as it was at login time.
    pub staff: Staff,
    /// Epoch milliseconds of the login.
    pub login_time: i64,
}

impl PersistedSession {
    /// Creates a session for a login that happened at `login_time`.
    pub fn new(staff: Staff, login_time: i64) -> Self {
        Self { staff, login_time }
    }

    /// Milliseconds elapsed since login.
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis - self.login_time
    }

    /// Whether the session has outlived `ttl_millis`. A session exactly
    /// at the TTL boundary is still valid.
    pub fn is_expired(&self, now_millis: i64, ttl_millis: i64) -> bool {
        self.age_millis(now_millis) > ttl_millis
    }
}
