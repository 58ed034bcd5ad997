//! FileVault CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod output;

use commands::{Cli, Commands};
use filevault_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    init_logging(&cli, &config);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// The server logs at the configured level; one-shot commands stay quiet.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let default_level = match cli.command {
        Commands::Serve(_) => config.logging.level.as_str(),
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match (&cli.command, config.logging.format.as_str()) {
        (Commands::Serve(_), "json") => fmt().json().with_env_filter(filter).init(),
        _ => fmt().with_env_filter(filter).init(),
    }
}
