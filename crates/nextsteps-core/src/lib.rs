//! # nextsteps-core
//!
//! Core crate for Next Steps. Contains the collaborator traits (document
//! store, blob store, local key-value storage, notifier), configuration
//! schemas, the document/filter types shared by every store, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Next Steps crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
