//! The store's fixed list of departments.

use nextsteps_core::config::TasksConfig;
use nextsteps_core::error::AppError;

/// Departments colleagues and tasks may be assigned to.
///
/// An empty catalog accepts any non-empty department label.
#[derive(Debug, Clone, Default)]
pub struct DepartmentCatalog {
    departments: Vec<String>,
}

impl DepartmentCatalog {
    /// Creates a catalog from an explicit list.
    pub fn new(departments: Vec<String>) -> Self {
        Self { departments }
    }

    /// Creates the catalog configured for the task board.
    pub fn from_config(config: &TasksConfig) -> Self {
        Self::new(config.departments.clone())
    }

    /// Every department, in display order.
    pub fn all(&self) -> &[String] {
        &self.departments
    }

    /// Whether `department` is in the catalog.
    pub fn contains(&self, department: &str) -> bool {
        self.departments.is_empty() || self.departments.iter().any(|d| d == department)
    }

    /// Rejects a department outside the catalog.
    pub fn validate(&self, department: &str) -> Result<(), AppError> {
        if self.contains(department) {
            Ok(())
        } else {
            Err(AppError::validation(format!("Unknown department '{department}'")))
        }
    }

    /// Rejects any department outside the catalog.
    pub fn validate_all(&self, departments: &[String]) -> Result<(), AppError> {
        departments.iter().try_for_each(|d| self.validate(d))
    }
}
