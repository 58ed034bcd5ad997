//! CLI command definitions and dispatch.

pub mod history;
pub mod list;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use filevault_core::config::AppConfig;
use filevault_core::error::AppError;
use filevault_service::VersionService;

/// FileVault: versioned binary object store
#[derive(Debug, Parser)]
#[command(name = "filevault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the FileVault server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// List stored versions
    List(list::ListArgs),
    /// Show one file's version chain
    History(history::HistoryArgs),
}

impl Cli {
    /// Load configuration for the selected `--config` file and `FILEVAULT_ENV`.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        let env = std::env::var("FILEVAULT_ENV").unwrap_or_else(|_| "development".to_string());
        AppConfig::load(&self.config, &env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::List(args) => list::execute(args, &config, self.format).await,
            Commands::History(args) => history::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: open the configured store without touching the schema
pub async fn open_service(config: &AppConfig) -> Result<VersionService, AppError> {
    let store = filevault_database::open_store(&config.database, false).await?;
    Ok(VersionService::new(store, config.versioning.clone()))
}
