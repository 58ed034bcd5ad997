//! Show one file's version chain.

use clap::Args;
use tokio_util::sync::CancellationToken;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_core::types::LogicalId;
use filevault_entity::file::FileVersion;

use crate::output::{self, OutputFormat, VersionRow};

/// Arguments for the history command
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Logical file id
    pub file_id: LogicalId,
}

/// Execute the history command
pub async fn execute(
    args: &HistoryArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::open_service(config).await?;
    let chain = service
        .get_history(args.file_id, &CancellationToken::new())
        .await?;

    if chain.is_empty() && format == OutputFormat::Table {
        output::print_warning(&format!("File {} has no versions", args.file_id));
        return Ok(());
    }

    output::print_list(&history_rows(&chain), format);
    Ok(())
}

/// Rows in version order with the highest version marked as latest.
fn history_rows(chain: &[FileVersion]) -> Vec<VersionRow> {
    let latest = chain.iter().map(|row| row.version).max();
    chain
        .iter()
        .map(|row| VersionRow::from_row(row).with_latest(Some(row.version) == latest))
        .collect()
}
