//! Colleague account management.

pub mod service;

pub use service::StaffService;
