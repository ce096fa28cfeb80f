//! # nextsteps-storage
//!
//! Blob storage for task photos. Objects are addressed by a relative
//! path (`task-images/<epoch-ms>.jpg`) and served from a public base URL.

pub mod manager;
pub mod path;
pub mod providers;

pub use manager::BlobStorage;
