use clap::Parser;
use tracing_subscriber::EnvFilter;

use cityhom_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets and storage keys
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Read once here; the server carries its own copy in AppState
    let config = cityhom_api::config::config().clone();
    tracing::info!("Starting CityHom API in {:?} mode", config.environment);

    if let Err(e) = cli::run(cli, config).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
