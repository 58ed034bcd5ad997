//! Database migration command.

use filevault_core::config::{AppConfig, DatabaseBackend};
use filevault_core::error::AppError;
use filevault_database::DatabasePool;
use filevault_database::migration::run_migrations;

use crate::output;

/// Execute the migrate command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The memory backend has no schema; nothing to migrate.");
        return Ok(());
    }

    output::print_kv("Database", &config.database.url);
    let pool = DatabasePool::connect(&config.database).await?;
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
