//! Staff entity model.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::role::StaffRole;
use crate::serde_helpers::one_or_many;

/// Number of digits in a login PIN.
pub const PIN_LENGTH: usize = 6;

/// A colleague account.
///
/// The PIN is the sole login credential and is stored and compared in
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    /// Document id. Equals the invitation token for self-setup accounts.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Departments this colleague works in.
    #[serde(alias = "department", deserialize_with = "one_or_many")]
    pub departments: Vec<String>,
    /// 6-digit login PIN.
    pub pin: String,
    /// Capability role.
    #[serde(default)]
    pub role: StaffRole,
}

impl Staff {
    /// Check if this colleague is a manager.
    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    /// Check whether the colleague is scoped to the given department.
    pub fn belongs_to(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

/// Data required to add a colleague.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    /// Display name.
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    /// Departments; at least one.
    #[validate(length(min = 1, message = "must include at least one department"))]
    pub departments: Vec<String>,
    /// 6-digit login PIN.
    #[validate(custom(function = "validate_pin_format"))]
    pub pin: String,
    /// Capability role.
    #[serde(default)]
    pub role: StaffRole,
}

/// Check that a PIN is exactly six ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit())
}

/// `validator` hook for PIN fields.
pub fn validate_pin_format(pin: &str) -> Result<(), ValidationError> {
    if is_valid_pin(pin) {
        Ok(())
    } else {
        let mut err = ValidationError::new("pin_format");
        err.message = Some("must be exactly 6 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_single_department() {
        let staff: Staff = serde_json::from_value(json!({
            "id": "s1",
            "name": "Priya",
            "department": "Frozen",
            "pin": "123456",
            "role": "manager"
        }))
        .unwrap();
        assert_eq!(staff.departments, vec!["Frozen".to_string()]);
        assert!(staff.is_manager());
    }

    #[test]
    fn test_missing_role_reads_as_staff() {
        let staff: Staff = serde_json::from_value(json!({
            "id": "s2",
            "name": "Tom",
            "departments": ["BWS", "Grocery"],
            "pin": "654321"
        }))
        .unwrap();
        assert_eq!(staff.role, StaffRole::Staff);
        assert!(staff.belongs_to("Grocery"));
        assert!(!staff.belongs_to("Frozen"));
    }

    #[test]
    fn test_pin_format() {
        assert!(is_valid_pin("000123"));
        assert!(!is_valid_pin("12345"));
        assert!(!is_valid_pin("1234567"));
        assert!(!is_valid_pin("12a456"));
        assert!(!is_valid_pin("１２３４５６"));
    }

    #[test]
    fn test_new_staff_validation() {
        let ok = NewStaff {
            name: "Ann".into(),
            departments: vec!["Frozen".into()],
            pin: "111111".into(),
            role: StaffRole::Staff,
        };
        assert!(ok.validate().is_ok());

        let bad = NewStaff {
            name: String::new(),
            departments: vec![],
            pin: "12".into(),
            role: StaffRole::Staff,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("departments"));
        assert!(fields.contains_key("pin"));
    }
}
