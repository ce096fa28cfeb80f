//! Staff domain entities.

pub mod model;
pub mod role;

pub use model::{NewStaff, Staff, is_valid_pin, validate_pin_format};
pub use role::StaffRole;
