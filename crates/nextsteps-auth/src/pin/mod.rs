//! PIN policy enforcement.

pub mod validator;

pub use validator::PinValidator;
