//! Role-to-capability mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use nextsteps_entity::staff::StaffRole;

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // Tasks
    /// Create a task.
    TaskCreate,
    /// Mark a task as completed.
    TaskComplete,
    /// Return a completed task to the open list.
    TaskUndoComplete,
    /// Browse recently completed tasks.
    TaskViewCompleted,

    // Colleagues
    /// Add a colleague directly with a chosen PIN.
    StaffAdd,
    /// List every colleague.
    StaffList,
    /// Issue a PIN-setup link.
    InvitationCreate,
}

/// Defines the mapping from each role to its set of capabilities.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of capabilities.
    policies: HashMap<StaffRole, HashSet<Capability>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let staff: HashSet<Capability> = [Capability::TaskCreate, Capability::TaskComplete]
            .into_iter()
            .collect();

        // Manager: everything staff can do plus the elevated affordances
        let mut manager = staff.clone();
        manager.extend([
            Capability::TaskUndoComplete,
            Capability::TaskViewCompleted,
            Capability::StaffAdd,
            Capability::StaffList,
            Capability::InvitationCreate,
        ]);

        let mut policies = HashMap::new();
        policies.insert(StaffRole::Staff, staff);
        policies.insert(StaffRole::Manager, manager);
        Self { policies }
    }

    /// Checks whether a role holds a capability.
    pub fn has_capability(&self, role: StaffRole, capability: Capability) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|caps| caps.contains(&capability))
    }

    /// Returns every capability of a role.
    pub fn capabilities_for(&self, role: StaffRole) -> Vec<Capability> {
        self.policies
            .get(&role)
            .map(|caps| caps.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Grants an extra capability to a role.
    pub fn grant(&mut self, role: StaffRole, capability: Capability) {
        self.policies.entry(role).or_default().insert(capability);
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
