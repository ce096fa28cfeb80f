//! Task domain entities.

pub mod model;

pub use model::{NewTask, Task};
