//! Record store trait for file version rows.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use filevault_core::config::{DatabaseBackend, DatabaseConfig};
use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::LogicalId;
use filevault_entity::file::{FileVersion, NewFileVersion};

use crate::connection::DatabasePool;
use crate::memory::MemoryFileVersionStore;
use crate::migration::run_migrations;
use crate::repositories::FileVersionRepository;

/// Durable, ordered persistence of [`FileVersion`] rows.
///
/// Implementations assign row ids, enforce uniqueness of row ids and of
/// `(logical_id, version)`, and make every write atomic: a write that is
/// cancelled or fails leaves storage exactly as it was. Absence is a normal
/// outcome and is reported as `None`, never as an error.
#[async_trait]
pub trait FileVersionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short name of the backing implementation, for logs.
    fn backend_name(&self) -> &'static str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist a row and return it with `id` and `created_at` populated.
    ///
    /// A duplicate `(logical_id, version)` fails with
    /// [`ErrorKind::Conflict`](filevault_core::ErrorKind::Conflict); any other
    /// write that does not take effect fails with
    /// [`ErrorKind::Persistence`](filevault_core::ErrorKind::Persistence).
    async fn insert(&self, row: NewFileVersion, cancel: &CancellationToken)
    -> AppResult<FileVersion>;

    /// All rows in ascending row-id order, or only those of one logical id.
    ///
    /// `None` and the nil UUID both mean "no filter".
    async fn list_all(
        &self,
        logical_id: Option<LogicalId>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<FileVersion>>;

    /// Point lookup by row id.
    async fn get_by_row_id(&self, id: i64, cancel: &CancellationToken)
    -> AppResult<Option<FileVersion>>;

    /// Point lookup by `(logical_id, version)`.
    async fn get_by_logical_and_version(
        &self,
        logical_id: LogicalId,
        version: i32,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>>;

    /// The row with the highest version for `logical_id`.
    ///
    /// Two rows sharing that version is a data-integrity fault and is
    /// reported as [`ErrorKind::Integrity`](filevault_core::ErrorKind::Integrity).
    async fn get_latest(
        &self,
        logical_id: LogicalId,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>>;

    /// Delete a row; returns whether one was removed.
    async fn remove(&self, id: i64, cancel: &CancellationToken) -> AppResult<bool>;
}

/// Open the store selected by configuration.
///
/// For SQLite this connects the pool and, when `migrate` is set, applies
/// pending migrations before returning.
pub async fn open_store(
    config: &DatabaseConfig,
    migrate: bool,
) -> AppResult<Arc<dyn FileVersionStore>> {
    match config.backend {
        DatabaseBackend::Memory => {
            info!("Using in-memory record store; data will not survive restart");
            Ok(Arc::new(MemoryFileVersionStore::new()))
        }
        DatabaseBackend::Sqlite => {
            let pool = DatabasePool::connect(config).await?;
            if migrate {
                run_migrations(pool.pool()).await?;
            }
            Ok(Arc::new(FileVersionRepository::new(pool.into_pool())))
        }
    }
}

/// Treat the nil UUID the same as an absent filter.
pub(crate) fn effective_filter(logical_id: Option<LogicalId>) -> Option<LogicalId> {
    logical_id.filter(|id| !id.is_nil())
}

/// Race `fut` against `cancel`, preferring cancellation when both are ready.
///
/// Dropping `fut` on cancellation is what rolls back any open transaction
/// it holds.
pub(crate) async fn cancellable<T, F>(
    cancel: &CancellationToken,
    operation: &str,
    fut: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::cancelled(format!("{operation} cancelled"))),
        result = fut => result,
    }
}
