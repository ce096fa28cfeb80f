//! Collaborator traits defined in `nextsteps-core` and implemented by other crates.

pub mod blob_store;
pub mod document_store;
pub mod key_value;
pub mod notifier;

pub use blob_store::{BlobHandle, BlobStore};
pub use document_store::{DocumentStore, SnapshotStream, Subscription, SubscriptionHandle};
pub use key_value::KeyValueStore;
pub use notifier::{LogNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};
