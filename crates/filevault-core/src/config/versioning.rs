//! Versioning protocol configuration.

use serde::{Deserialize, Serialize};

/// How an update treats `file_name` / `content_type` the caller left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataPolicy {
    /// Omitted values are stored as empty strings.
    #[default]
    Overwrite,
    /// Omitted values are copied from the current latest version.
    Inherit,
}

/// Settings for the version manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// Metadata carry-over rule for updates.
    #[serde(default)]
    pub metadata_policy: MetadataPolicy,
}
