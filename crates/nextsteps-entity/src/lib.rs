//! # nextsteps-entity
//!
//! Domain entity models for Next Steps. Every struct in this crate
//! represents a document in one of the store collections or a value
//! persisted on the device. Stored field names are camelCase.

pub mod invitation;
pub mod serde_helpers;
pub mod session;
pub mod staff;
pub mod task;

/// Collection names used in the document store.
pub mod collections {
    /// Colleague accounts.
    pub const STAFF: &str = "staff";
    /// Task board entries.
    pub const TASKS: &str = "tasks";
    /// Outstanding PIN-setup invitations.
    pub const PENDING_INVITATIONS: &str = "pendingPins";
    /// PIN reservations keyed by PIN, used to make PIN assignment atomic.
    pub const PIN_CLAIMS: &str = "pinClaims";
}
