//! Core type definitions shared by every store implementation.

pub mod document;
pub mod filter;

pub use document::{Document, Fields};
pub use filter::{Filter, FilterField};
