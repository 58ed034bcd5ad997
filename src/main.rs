//! FileVault Server: versioned binary object store over HTTP.
//!
//! Main entry point that wires the crates together and starts the server.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("FILEVAULT_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("FILEVAULT_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        metadata_policy = ?config.versioning.metadata_policy,
        "Starting FileVault"
    );

    let store = filevault_database::open_store(&config.database, true).await?;

    let shutdown = CancellationToken::new();
    filevault_api::cancel_on_signal(&shutdown);

    filevault_api::run_server(config, store, shutdown).await?;

    tracing::info!("FileVault server shut down gracefully");
    Ok(())
}
