//! Task board: creation, completion, visibility and the live feed.

pub mod feed;
pub mod service;
pub mod visibility;

pub use feed::{FeedToggle, TaskFeed};
pub use service::TaskService;
pub use visibility::{ViewToggle, VisibleTasks, open_tasks, visible_tasks};
