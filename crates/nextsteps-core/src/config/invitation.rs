//! PIN-setup invitation configuration.

use serde::{Deserialize, Serialize};

/// Invitation link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    /// Base URL of the setup page; the token is appended as `?token=`.
    #[serde(default = "default_setup_base_url")]
    pub setup_base_url: String,
    /// Hours a pending invitation stays claimable. `0` disables expiry.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            setup_base_url: default_setup_base_url(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_setup_base_url() -> String {
    "https://tesco-three.vercel.app/setup".to_string()
}

fn default_ttl_hours() -> u64 {
    168 // 7 days
}
