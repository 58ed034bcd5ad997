//! Upload payload handed to the version manager.

use serde::{Deserialize, Serialize};

/// Metadata and content for a create or update.
///
/// `file_name` and `content_type` are optional; what an absent value
/// means on update is decided by the configured metadata policy. On
/// create an absent value is stored as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Display name, if supplied.
    pub file_name: Option<String>,
    /// MIME type, if supplied.
    pub content_type: Option<String>,
    /// Raw payload.
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl FileCandidate {
    /// Candidate with content only.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            content: content.into(),
        }
    }

    /// Set the display name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
