//! SQLite connection pool management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use filevault_core::config::DatabaseConfig;
use filevault_core::error::{AppError, ErrorKind};

/// Wrapper around the sqlx SQLite connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    ///
    /// The database file and its parent directory are created if missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid database URL '{}': {e}", config.url),
                    e,
                )
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        ensure_parent_dir(options.get_filename()).await?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to SQLite");
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// sqlx opens `sqlite::memory:` as a uniquely named shared-cache database
    /// that is dropped once its last connection closes. The pool keeps exactly
    /// one connection alive and never recycles it, so the data lives as long
    /// as the pool.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Invalid memory URL", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open in-memory database", e)
            })?;

        Ok(Self { pool })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the underlying sqlx pool (consuming self).
    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        health_check(&self.pool).await
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Run `SELECT 1` against the pool.
pub(crate) async fn health_check(pool: &SqlitePool) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|v| v == 1)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
}

async fn ensure_parent_dir(filename: &Path) -> Result<(), AppError> {
    if filename.as_os_str() == ":memory:" {
        return Ok(());
    }
    match filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to create database directory '{}'", parent.display()),
                    e,
                )
            })
        }
        _ => Ok(()),
    }
}
