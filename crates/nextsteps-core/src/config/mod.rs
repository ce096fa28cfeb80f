//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so an empty file is valid.

pub mod database;
pub mod invitation;
pub mod local;
pub mod logging;
pub mod session;
pub mod storage;
pub mod tasks;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::invitation::InvitationConfig;
pub use self::local::LocalStorageConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::storage::StorageConfig;
pub use self::tasks::TasksConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Document store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Local persistent key-value storage settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// PIN-setup invitation settings.
    #[serde(default)]
    pub invitation: InvitationConfig,
    /// Task board settings.
    #[serde(default)]
    pub tasks: TasksConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default`, the environment overlay `config/{env}` and
    /// environment variables prefixed with `NEXTSTEPS_` (nested keys use
    /// `__`, e.g. `NEXTSTEPS_SESSION__TTL_HOURS`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration with an explicit base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let base = base.trim_end_matches(".toml");
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NEXTSTEPS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
