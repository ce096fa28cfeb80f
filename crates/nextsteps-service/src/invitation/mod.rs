//! PIN-setup invitations: PENDING until claimed, then deleted.

pub mod link;
pub mod service;

pub use link::{setup_link, token_from_link};
pub use service::{InvitationService, PendingSetup, SetupLink};
