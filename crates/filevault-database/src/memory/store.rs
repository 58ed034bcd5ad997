//! In-memory record store guarded by a single `RwLock`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::LogicalId;
use filevault_entity::file::{FileVersion, NewFileVersion};

use crate::store::{FileVersionStore, cancellable, effective_filter};

/// Rows plus the composite-key index, mutated only under the write lock.
#[derive(Debug)]
struct Table {
    /// Rows keyed by row id; iteration order is insertion order.
    rows: BTreeMap<i64, FileVersion>,
    /// `(logical_id, version)` -> row id.
    by_key: HashMap<(LogicalId, i32), i64>,
    /// Next row id to hand out. Never decreases, so ids are not reused.
    next_id: i64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            by_key: HashMap::new(),
            next_id: 1,
        }
    }
}

/// Process-local record store.
///
/// Every write is applied in one critical section with no await points,
/// so a write is either fully visible or not at all.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileVersionStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryFileVersionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rows.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FileVersionStore for MemoryFileVersionStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert(
        &self,
        row: NewFileVersion,
        cancel: &CancellationToken,
    ) -> AppResult<FileVersion> {
        let mut table = cancellable(cancel, "insert", async { Ok(self.table.write().await) }).await?;

        let key = (row.logical_id, row.version);
        if table.by_key.contains_key(&key) {
            return Err(AppError::conflict(format!(
                "Version {} of file {} already exists",
                row.version, row.logical_id
            )));
        }

        let id = table.next_id;
        table.next_id += 1;
        let inserted = row.into_row(id, Utc::now());
        table.by_key.insert(key, id);
        table.rows.insert(id, inserted.clone());

        debug!(
            id,
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
        let table = cancellable(cancel, "list", async { Ok(self.table.read().await) }).await?;
        let filter = effective_filter(logical_id);

        Ok(table
            .rows
            .values()
            .filter(|row| filter.is_none_or(|id| row.logical_id == id))
            .cloned()
            .collect())
    }

    async fn get_by_row_id(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        let table = cancellable(cancel, "get", async { Ok(self.table.read().await) }).await?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_by_logical_and_version(
        &self,
        logical_id: LogicalId,
        version: i32,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        let table = cancellable(cancel, "get", async { Ok(self.table.read().await) }).await?;
        Ok(table
            .by_key
            .get(&(logical_id, version))
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn get_latest(
        &self,
        logical_id: LogicalId,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        let table = cancellable(cancel, "get latest", async { Ok(self.table.read().await) }).await?;

        let mut latest: Option<&FileVersion> = None;
        for row in table.rows.values().filter(|r| r.logical_id == logical_id) {
            match latest {
                Some(current) if current.version == row.version => {
                    return Err(AppError::integrity(format!(
                        "File {logical_id} has rows {} and {} at version {}",
                        current.id, row.id, row.version
                    )));
                }
                Some(current) if current.version > row.version => {}
                _ => latest = Some(row),
            }
        }
        Ok(latest.cloned())
    }

    async fn remove(&self, id: i64, cancel: &CancellationToken) -> AppResult<bool> {
        let mut table = cancellable(cancel, "remove", async { Ok(self.table.write().await) }).await?;

        match table.rows.remove(&id) {
            Some(row) => {
                table.by_key.remove(&(row.logical_id, row.version));
                debug!(id, logical_id = %row.logical_id, version = row.version, "Removed file version");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
