//! Department- and role-scoped task visibility.
//!
//! Everything here is pure: it runs on every snapshot and every toggle
//! change and performs no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nextsteps_core::error::AppError;
use nextsteps_entity::staff::Staff;
use nextsteps_entity::task::Task;

/// Display-only narrowing or widening of the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewToggle {
    /// Role default: managers see everything, staff their departments.
    #[default]
    Default,
    /// Every task regardless of department.
    AllDepartments,
    /// Only the viewer's own departments.
    DepartmentOnly,
}

impl fmt::Display for ViewToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::AllDepartments => write!(f, "all_departments"),
            Self::DepartmentOnly => write!(f, "department_only"),
        }
    }
}

impl FromStr for ViewToggle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "all" | "all_departments" => Ok(Self::AllDepartments),
            "department" | "department_only" => Ok(Self::DepartmentOnly),
            other => Err(AppError::validation(format!("Unknown view '{other}'"))),
        }
    }
}

/// The tasks a colleague sees, plus how many the current view hides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleTasks {
    /// Visible tasks, in snapshot order.
    pub tasks: Vec<Task>,
    /// Open tasks filtered out by department.
    pub hidden: usize,
    /// The view that produced this list.
    pub toggle: ViewToggle,
}

impl VisibleTasks {
    /// Whether the "view all departments" affordance has anything to reveal.
    pub fn has_hidden(&self) -> bool {
        self.hidden > 0
    }
}

/// Drop completed tasks from a snapshot.
pub fn open_tasks(tasks: Vec<Task>) -> Vec<Task> {
    tasks.into_iter().filter(Task::is_open).collect()
}

/// Apply the role rules and the toggle to a snapshot of open tasks.
pub fn visible_tasks(tasks: &[Task], viewer: &Staff, toggle: ViewToggle) -> VisibleTasks {
    let narrow = match toggle {
        ViewToggle::AllDepartments => false,
        ViewToggle::DepartmentOnly => true,
        ViewToggle::Default => !viewer.is_manager(),
    };

    let (visible, hidden): (Vec<&Task>, Vec<&Task>) = tasks
        .iter()
        .partition(|t| !narrow || viewer.belongs_to(&t.department));

    VisibleTasks {
        tasks: visible.into_iter().cloned().collect(),
        hidden: hidden.len(),
        toggle,
    }
}
