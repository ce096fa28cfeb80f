//! Blob store provider implementations.

#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "local")]
pub use local::LocalBlobStore;
#[cfg(feature = "memory")]
pub use memory::MemoryBlobStore;
