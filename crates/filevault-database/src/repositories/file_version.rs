//! File version repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::types::LogicalId;
use filevault_entity::file::{FileVersion, NewFileVersion};

use crate::connection;
use crate::store::{FileVersionStore, cancellable, effective_filter};

/// SQLite-backed record store for file versions.
///
/// Uniqueness of `(logical_id, version)` is enforced by the
/// `file_versions_logical_id_version_key` constraint, so two writers that
/// raced through a read-then-insert cannot both persist the same version.
#[derive(Debug, Clone)]
pub struct FileVersionRepository {
    pool: SqlitePool,
}

impl FileVersionRepository {
    /// Create a new file version repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn begin(&self, cancel: &CancellationToken) -> AppResult<Transaction<'static, Sqlite>> {
        cancellable(cancel, "begin transaction", async {
            self.pool.begin().await.map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to begin transaction", e)
            })
        })
        .await
    }

    /// Commit unless the caller gave up first.
    ///
    /// The commit itself is not raced against the token: once it starts,
    /// the outcome is reported whichever way it lands.
    async fn commit(tx: Transaction<'static, Sqlite>, cancel: &CancellationToken) -> AppResult<()> {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Write cancelled before commit"));
        }
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to commit transaction", e)
        })
    }
}

#[async_trait]
impl FileVersionStore for FileVersionRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> AppResult<bool> {
        connection::health_check(&self.pool).await
    }

    async fn insert(
        &self,
        row: NewFileVersion,
        cancel: &CancellationToken,
    ) -> AppResult<FileVersion> {
        let mut tx = self.begin(cancel).await?;
        let created_at = Utc::now();

        // A zero-length blob can bind as NULL; store it as x'' instead.
        let inserted = cancellable(cancel, "insert", async {
            sqlx::query_as::<_, FileVersion>(
                "INSERT INTO file_versions (logical_id, file_name, content_type, content, version, created_at) \
                 VALUES (?, ?, ?, COALESCE(?, x''), ?, ?) RETURNING *",
            )
            .bind(row.logical_id)
            .bind(&row.file_name)
            .bind(&row.content_type)
            .bind(&row.content)
            .bind(row.version)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &row))
        })
        .await?;

        Self::commit(tx, cancel).await?;

        debug!(
            id = inserted.id,
            logical_id = %inserted.logical_id,
            version = inserted.version,
            "Inserted file version"
        );
        Ok(inserted)
    }

    async fn list_all(
        &self,
        logical_id: Option<LogicalId>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<FileVersion>> {
        cancellable(cancel, "list", async {
            let rows = match effective_filter(logical_id) {
                Some(logical_id) => {
                    sqlx::query_as::<_, FileVersion>(
                        "SELECT * FROM file_versions WHERE logical_id = ? ORDER BY id ASC",
                    )
                    .bind(logical_id)
                    .fetch_all(&self.pool)
                    .await
                }
                None => {
                    sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions ORDER BY id ASC")
                        .fetch_all(&self.pool)
                        .await
                }
            };
            rows.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list file versions", e)
            })
        })
        .await
    }

    async fn get_by_row_id(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        cancellable(cancel, "get", async {
            sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find file version", e)
                })
        })
        .await
    }

    async fn get_by_logical_and_version(
        &self,
        logical_id: LogicalId,
        version: i32,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        cancellable(cancel, "get", async {
            sqlx::query_as::<_, FileVersion>(
                "SELECT * FROM file_versions WHERE logical_id = ? AND version = ?",
            )
            .bind(logical_id)
            .bind(version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file version", e)
            })
        })
        .await
    }

    async fn get_latest(
        &self,
        logical_id: LogicalId,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        let top = cancellable(cancel, "get latest", async {
            sqlx::query_as::<_, FileVersion>(
                "SELECT * FROM file_versions WHERE logical_id = ? ORDER BY version DESC, id DESC LIMIT 2",
            )
            .bind(logical_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find latest version", e)
            })
        })
        .await?;

        latest_of(logical_id, top)
    }

    async fn remove(&self, id: i64, cancel: &CancellationToken) -> AppResult<bool> {
        let mut tx = self.begin(cancel).await?;

        let result = cancellable(cancel, "remove", async {
            sqlx::query("DELETE FROM file_versions WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Persistence, "Failed to delete file version", e)
                })
        })
        .await?;

        Self::commit(tx, cancel).await?;

        let removed = result.rows_affected() > 0;
        if removed {
            debug!(id, "Removed file version");
        }
        Ok(removed)
    }
}

/// Pick the latest row from at most two candidates ordered by version desc.
fn latest_of(logical_id: LogicalId, mut top: Vec<FileVersion>) -> AppResult<Option<FileVersion>> {
    if let [first, second, ..] = top.as_slice() {
        if first.version == second.version {
            return Err(AppError::integrity(format!(
                "File {logical_id} has rows {} and {} at version {}",
                first.id, second.id, first.version
            )));
        }
    }
    top.truncate(1);
    Ok(top.pop())
}

fn map_insert_error(e: sqlx::Error, row: &NewFileVersion) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::with_source(
            ErrorKind::Conflict,
            format!(
                "Version {} of file {} already exists",
                row.version, row.logical_id
            ),
            e,
        ),
        sqlx::Error::RowNotFound => AppError::persistence(format!(
            "Insert of version {} of file {} affected no rows",
            row.version, row.logical_id
        )),
        _ => AppError::with_source(ErrorKind::Persistence, "Failed to insert file version", e),
    }
}
