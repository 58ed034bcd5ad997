//! Record store configuration.

use serde::{Deserialize, Serialize};

/// Which record store implementation backs the version manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// SQLite file database via sqlx.
    #[default]
    Sqlite,
    /// Process-local store; contents are lost on exit.
    Memory,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store implementation.
    #[serde(default)]
    pub backend: DatabaseBackend,
    /// SQLite connection URL, e.g. `sqlite://data/filevault.db`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// How long a writer waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: default_url(),
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

fn default_url() -> String {
    "sqlite://data/filevault.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_busy_timeout() -> u64 {
    5_000
}
