//! Task board configuration.

use serde::{Deserialize, Serialize};

/// Task board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// How many days completed tasks stay listed in the completed view.
    #[serde(default = "default_completed_retention")]
    pub completed_retention_days: u32,
    /// Blob path prefix for task images.
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,
    /// Store departments offered when creating tasks and colleagues.
    #[serde(default = "default_departments")]
    pub departments: Vec<String>,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            completed_retention_days: default_completed_retention(),
            image_prefix: default_image_prefix(),
            departments: default_departments(),
        }
    }
}

fn default_completed_retention() -> u32 {
    14
}

fn default_image_prefix() -> String {
    "task-images".to_string()
}

fn default_departments() -> Vec<String> {
    [
        "Frozen",
        "Grocery",
        "BWS",
        "GM & HB",
        "Dairy, Meat & Poultry",
        "Services",
        "Produce & Bakery",
        "Bread & Cakes",
        "Dot Com",
        "Clothing",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
