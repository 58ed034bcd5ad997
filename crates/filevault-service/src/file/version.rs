//! File versioning service: create, update, delete, and query version chains.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use filevault_core::config::{MetadataPolicy, VersioningConfig};
use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::LogicalId;
use filevault_database::FileVersionStore;
use filevault_entity::file::{FileCandidate, FileVersion, NewFileVersion};

/// Manages file version chains.
///
/// "Latest" is derived (highest surviving version), never stored, so an
/// update only ever appends a row. Store errors are returned unchanged;
/// in particular a [`Conflict`](filevault_core::ErrorKind::Conflict) from a
/// concurrent update racing for the same version is not retried here.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Record store.
    store: Arc<dyn FileVersionStore>,
    /// Versioning settings.
    config: VersioningConfig,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(store: Arc<dyn FileVersionStore>, config: VersioningConfig) -> Self {
        Self { store, config }
    }

    /// The record store behind this service.
    pub fn store(&self) -> &Arc<dyn FileVersionStore> {
        &self.store
    }

    /// Stores version 1 of a new logical file under a freshly minted id.
    pub async fn create(
        &self,
        candidate: FileCandidate,
        cancel: &CancellationToken,
    ) -> AppResult<FileVersion> {
        let row = NewFileVersion {
            logical_id: LogicalId::new(),
            file_name: candidate.file_name.unwrap_or_default(),
            content_type: candidate.content_type.unwrap_or_default(),
            content: candidate.content,
            version: 1,
        };

        self.store.insert(row, cancel).await
    }

    /// Appends a new version to an existing logical file.
    ///
    /// Returns `Ok(None)` when `logical_id` has no live rows; updates never
    /// mint identities. The previous latest row is left in place.
    pub async fn update(
        &self,
        logical_id: LogicalId,
        candidate: FileCandidate,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        let Some(latest) = self.store.get_latest(logical_id, cancel).await? else {
            return Ok(None);
        };

        let version = latest.version.checked_add(1).ok_or_else(|| {
            AppError::persistence(format!("File {logical_id} has no version after {}", latest.version))
        })?;

        let policy = self.config.metadata_policy;
        let row = NewFileVersion {
            logical_id,
            file_name: resolve_metadata(candidate.file_name, &latest.file_name, policy),
            content_type: resolve_metadata(candidate.content_type, &latest.content_type, policy),
            content: candidate.content,
            version,
        };

        self.store.insert(row, cancel).await.map(Some)
    }

    /// Deletes one row by row id. `false` means there was nothing to delete.
    pub async fn delete_by_row_id(&self, id: i64, cancel: &CancellationToken) -> AppResult<bool> {
        match self.store.get_by_row_id(id, cancel).await? {
            Some(row) => self.store.remove(row.id, cancel).await,
            None => Ok(false),
        }
    }

    /// Deletes one version of a logical file, leaving a gap in the chain if
    /// it was not the latest.
    pub async fn delete_by_logical_and_version(
        &self,
        logical_id: LogicalId,
        version: i32,
        cancel: &CancellationToken,
    ) -> AppResult<bool> {
        match self
            .store
            .get_by_logical_and_version(logical_id, version, cancel)
            .await?
        {
            Some(row) => self.store.remove(row.id, cancel).await,
            None => Ok(false),
        }
    }

    /// Lists every row, or one logical file's rows, in row-id order.
    pub async fn get_all(
        &self,
        logical_id: Option<LogicalId>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<FileVersion>> {
        self.store.list_all(logical_id, cancel).await
    }

    /// One logical file's chain ordered by version.
    pub async fn get_history(
        &self,
        logical_id: LogicalId,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<FileVersion>> {
        let mut rows = self.store.list_all(Some(logical_id), cancel).await?;
        rows.sort_by_key(|row| row.version);
        Ok(rows)
    }

    /// Looks up a row by row id.
    pub async fn get_by_row_id(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        self.store.get_by_row_id(id, cancel).await
    }

    /// Looks up a specific version of a logical file.
    pub async fn get_by_logical_and_version(
        &self,
        logical_id: LogicalId,
        version: i32,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        self.store
            .get_by_logical_and_version(logical_id, version, cancel)
            .await
    }

    /// Looks up the highest surviving version of a logical file.
    pub async fn get_latest(
        &self,
        logical_id: LogicalId,
        cancel: &CancellationToken,
    ) -> AppResult<Option<FileVersion>> {
        self.store.get_latest(logical_id, cancel).await
    }
}

fn resolve_metadata(supplied: Option<String>, previous: &str, policy: MetadataPolicy) -> String {
    match (supplied, policy) {
        (Some(value), _) => value,
        (None, MetadataPolicy::Inherit) => previous.to_string(),
        (None, MetadataPolicy::Overwrite) => String::new(),
    }
}
