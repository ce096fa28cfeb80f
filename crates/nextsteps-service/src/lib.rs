//! # nextsteps-service
//!
//! Business logic service layer for Next Steps. Each service orchestrates
//! repositories, blob storage and the auth crate to implement one area of
//! the app: the task board, colleague accounts, and PIN-setup invitations.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time.

pub mod catalog;
pub mod context;
pub mod invitation;
pub mod pin_registry;
pub mod staff;
pub mod task;

pub use catalog::DepartmentCatalog;
pub use context::ActorContext;
pub use invitation::{InvitationService, PendingSetup};
pub use staff::StaffService;
pub use task::{TaskFeed, TaskService, ViewToggle, VisibleTasks};
