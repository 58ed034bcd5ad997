//! List stored versions.

use clap::Args;
use tokio_util::sync::CancellationToken;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_core::types::LogicalId;

use crate::output::{self, OutputFormat, VersionRow};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list versions of this logical file
    #[arg(long)]
    pub file_id: Option<LogicalId>,
}

/// Execute the list command
pub async fn execute(
    args: &ListArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = super::open_service(config).await?;
    let rows = service
        .get_all(args.file_id, &CancellationToken::new())
        .await?;

    let rows: Vec<VersionRow> = rows.iter().map(VersionRow::from_row).collect();
    output::print_list(&rows, format);
    Ok(())
}
