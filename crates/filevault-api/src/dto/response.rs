//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filevault_entity::file::FileVersion;

/// Metadata view of a stored version. Content is never inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVersionResponse {
    /// Row id.
    pub id: i64,
    /// Logical file id.
    pub file_id: Uuid,
    /// Display name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Version number within the logical file.
    pub version: i32,
    /// Content length in bytes.
    pub size_bytes: u64,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

impl From<&FileVersion> for FileVersionResponse {
    fn from(row: &FileVersion) -> Self {
        Self {
            id: row.id,
            file_id: row.logical_id.into_uuid(),
            file_name: row.file_name.clone(),
            content_type: row.content_type.clone(),
            version: row.version,
            size_bytes: row.size_bytes() as u64,
            created_at: row.created_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`.
    pub status: String,
    /// Record store backend name.
    pub backend: String,
    /// Server version.
    pub version: String,
}
