//! # nextsteps-cache
//!
//! Local persistent key-value storage for Next Steps. Two providers:
//!
//! - **file**: a JSON object on disk, rewritten on every change, so values
//!   survive process restarts
//! - **memory**: an in-process [`dashmap`](https://crates.io/crates/dashmap),
//!   for tests and throwaway runs
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "file")]
pub mod file;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::LocalStorageManager;
