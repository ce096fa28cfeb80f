//! RBAC enforcement: checks whether the acting colleague holds a capability.

use nextsteps_core::error::AppError;
use nextsteps_entity::staff::{Staff, StaffRole};

use super::policies::{Capability, RbacPolicies};

/// Enforces role-based capabilities for manager-only operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Checks that the colleague's role holds `capability`.
    pub fn require(&self, actor: &Staff, capability: Capability) -> Result<(), AppError> {
        self.require_role(actor.role, capability)
    }

    /// Checks that a role holds `capability`.
    pub fn require_role(&self, role: StaffRole, capability: Capability) -> Result<(), AppError> {
        if self.policies.has_capability(role, capability) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have capability '{capability:?}'"
            )))
        }
    }

    /// Checks whether the colleague holds `capability` (returns bool).
    pub fn can(&self, actor: &Staff, capability: Capability) -> bool {
        self.policies.has_capability(actor.role, capability)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
