//! In-process document store with change notification.

pub mod snapshot;
pub mod store;

pub use store::MemoryDocumentStore;
