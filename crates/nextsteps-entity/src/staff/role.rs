//! Staff role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a colleague account can hold.
///
/// The role is a capability flag only: managers get the add-colleague,
/// invitation, completed-task and all-department affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Store manager.
    Manager,
    /// Regular colleague.
    #[default]
    Staff,
}

impl StaffRole {
    /// Check if this role is a manager.
    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = nextsteps_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(nextsteps_core::AppError::validation(format!(
                "Invalid staff role: '{s}'. Expected one of: manager, staff"
            ))),
        }
    }
}
