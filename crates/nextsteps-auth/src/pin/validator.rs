//! PIN format policy for new and claimed PINs.

use nextsteps_core::error::AppError;
use nextsteps_entity::staff::model::PIN_LENGTH;

/// Validates that a PIN has the required shape.
///
/// Login never calls this: a malformed PIN simply matches nothing.
#[derive(Debug, Clone)]
pub struct PinValidator {
    /// Required number of digits.
    length: usize,
}

impl PinValidator {
    /// Creates a validator for the standard 6-digit PIN.
    pub fn new() -> Self {
        Self { length: PIN_LENGTH }
    }

    /// Whether the PIN is exactly the required number of ASCII digits.
    pub fn is_well_formed(&self, pin: &str) -> bool {
        pin.len() == self.length && pin.bytes().all(|b| b.is_ascii_digit())
    }

    /// Validates a PIN, describing the first violation found.
    pub fn validate(&self, pin: &str) -> Result<(), AppError> {
        if pin.is_empty() {
            return Err(AppError::validation("PIN is required"));
        }

        if !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation("PIN must contain digits only"));
        }

        if pin.len() != self.length {
            return Err(AppError::validation(format!(
                "PIN must be exactly {} digits",
                self.length
            )));
        }

        Ok(())
    }
}

impl Default for PinValidator {
    fn default() -> Self {
        Self::new()
    }
}
