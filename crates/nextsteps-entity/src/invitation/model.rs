//! Pending PIN-setup invitation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::serde_helpers::one_or_many;

/// An invitation for a prospective colleague to choose their own PIN.
///
/// Created by a manager and deleted once the invitee claims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitation {
    /// Document id (distinct from the token).
    pub id: String,
    /// Token carried in the setup link; becomes the new staff id.
    pub token: String,
    /// Prospective colleague's display name.
    pub name: String,
    /// Departments the colleague will be scoped to.
    #[serde(alias = "department", deserialize_with = "one_or_many")]
    pub departments: Vec<String>,
    /// Creation time (epoch milliseconds, server-resolved).
    #[serde(default)]
    pub created_at: i64,
}

impl PendingInvitation {
    /// Whether the invitation is past its time-to-live. A `ttl_millis`
    /// of `None` means invitations never expire.
    pub fn is_expired(&self, now_millis: i64, ttl_millis: Option<i64>) -> bool {
        match ttl_millis {
            Some(ttl) => now_millis - self.created_at > ttl,
            None => false,
        }
    }
}

/// Data a manager supplies to generate a setup link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewInvitation {
    /// Prospective colleague's display name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Departments; at least one.
    #[validate(length(min = 1, message = "must include at least one department"))]
    pub departments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(created_at: i64) -> PendingInvitation {
        PendingInvitation {
            id: "doc".into(),
            token: "tok".into(),
            name: "Sam".into(),
            departments: vec!["Clothing".into()],
            created_at,
        }
    }

    #[test]
    fn test_no_ttl_never_expires() {
        assert!(!invitation(0).is_expired(i64::MAX, None));
    }

    #[test]
    fn test_ttl_boundary() {
        let inv = invitation(1_000);
        assert!(!inv.is_expired(2_000, Some(1_000)));
        assert!(inv.is_expired(2_001, Some(1_000)));
    }
}
