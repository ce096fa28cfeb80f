//! # nextsteps-auth
//!
//! Authentication and authorization for Next Steps.
//!
//! ## Modules
//!
//! - `session` - PIN login, device-local session persistence with expiry,
//!   restore on cold start, logout
//! - `pin` - PIN format policy
//! - `rbac` - role-based capability checks for manager-only operations

pub mod pin;
pub mod rbac;
pub mod session;

pub use pin::PinValidator;
pub use rbac::{Capability, RbacEnforcer, RbacPolicies};
pub use session::{SessionManager, SessionStore};
