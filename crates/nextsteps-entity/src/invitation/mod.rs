//! PIN-setup invitation entities.

pub mod model;

pub use model::{NewInvitation, PendingInvitation};
