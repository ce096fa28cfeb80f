//! # nextsteps-database
//!
//! Document store implementations and the typed repositories the
//! services use for every Next Steps collection.

pub mod connection;
pub mod memory;
pub mod repositories;

pub use connection::connect;
pub use memory::MemoryDocumentStore;
