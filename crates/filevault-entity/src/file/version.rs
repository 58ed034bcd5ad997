//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filevault_core::types::LogicalId;

/// One stored revision of a logical file.
///
/// Rows are immutable once written. An update appends a new row with the
/// next version number; it never rewrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Store-assigned surrogate id, unique across all logical files.
    pub id: i64,
    /// Identity shared by every version of the same logical file.
    pub logical_id: LogicalId,
    /// Display name; may be empty.
    pub file_name: String,
    /// MIME type; may be empty.
    pub content_type: String,
    /// Raw payload; may be empty but is always present.
    #[serde(skip)]
    pub content: Vec<u8>,
    /// Position in the version chain, starting at 1.
    pub version: i32,
    /// When the store persisted this row.
    pub created_at: DateTime<Utc>,
}

impl FileVersion {
    /// Size of the payload in bytes.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// A row ready to be inserted; the store fills in `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileVersion {
    /// Logical identity the row belongs to.
    pub logical_id: LogicalId,
    /// Display name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Raw payload.
    pub content: Vec<u8>,
    /// Version number to claim.
    pub version: i32,
}

impl NewFileVersion {
    /// Attach store-assigned fields, producing the persisted row.
    pub fn into_row(self, id: i64, created_at: DateTime<Utc>) -> FileVersion {
        FileVersion {
            id,
            logical_id: self.logical_id,
            file_name: self.file_name,
            content_type: self.content_type,
            content: self.content,
            version: self.version,
            created_at,
        }
    }
}
