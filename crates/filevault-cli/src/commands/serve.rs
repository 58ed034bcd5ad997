//! Start the FileVault server.

use clap::Args;
use tokio_util::sync::CancellationToken;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    let store = filevault_database::open_store(&config.database, !args.no_migrate).await?;

    let shutdown = CancellationToken::new();
    filevault_api::cancel_on_signal(&shutdown);

    filevault_api::run_server(config, store, shutdown).await
}
