//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so that an empty
//! file (or no file at all) yields a runnable configuration.

pub mod app;
pub mod database;
pub mod logging;
pub mod versioning;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::logging::LoggingConfig;
pub use self::versioning::{MetadataPolicy, VersioningConfig};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "FILEVAULT";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay + env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Versioning protocol settings.
    #[serde(default)]
    pub versioning: VersioningConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Reads the base file at `path` (extension optional), then an overlay
    /// `config/{env}.toml` when present, then environment variables
    /// prefixed with `FILEVAULT__`, e.g. `FILEVAULT__SERVER__PORT=9000`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_yield_defaults() {
        let config = AppConfig::load("does/not/exist", "nowhere").expect("defaults");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.versioning.metadata_policy, MetadataPolicy::Overwrite);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[versioning]\nmetadata_policy = \"inherit\"\n[database]\nbackend = \"memory\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("parse");

        assert_eq!(parsed.versioning.metadata_policy, MetadataPolicy::Inherit);
        assert_eq!(parsed.database.backend, DatabaseBackend::Memory);
        assert_eq!(parsed.database.max_connections, 5);
        assert_eq!(parsed.logging.level, "info");
    }
}
