//! Table and JSON output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use filevault_entity::file::FileVersion;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One version row as printed by `list` and `history`. Content is omitted.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct VersionRow {
    /// Row id
    #[tabled(rename = "ID")]
    pub id: i64,
    /// Logical file id
    #[tabled(rename = "File ID")]
    pub file_id: String,
    /// Version number
    #[tabled(rename = "Version")]
    pub version: i32,
    /// Display name
    #[tabled(rename = "Name")]
    pub file_name: String,
    /// MIME type
    #[tabled(rename = "Type")]
    pub content_type: String,
    /// Content length
    #[tabled(rename = "Size")]
    pub size_bytes: usize,
    /// Insertion time
    #[tabled(rename = "Created")]
    pub created_at: DateTime<Utc>,
    /// Whether this is the highest surviving version
    #[tabled(rename = "Latest", display = "display_latest")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<bool>,
}

impl VersionRow {
    /// Row without a latest marker.
    pub fn from_row(row: &FileVersion) -> Self {
        Self {
            id: row.id,
            file_id: row.logical_id.to_string(),
            version: row.version,
            file_name: row.file_name.clone(),
            content_type: row.content_type.clone(),
            size_bytes: row.size_bytes(),
            created_at: row.created_at,
            latest: None,
        }
    }

    /// Row with the latest marker set.
    pub fn with_latest(mut self, latest: bool) -> Self {
        self.latest = Some(latest);
        self
    }
}

fn display_latest(latest: &Option<bool>) -> String {
    match latest {
        Some(true) => "*".to_string(),
        _ => String::new(),
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
