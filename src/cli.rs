// Command-line entry points for the server binary
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::manager::DatabaseManager;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgDocumentStore;
use crate::database::store::DocumentStore;
use crate::storage::s3::S3Storage;

#[derive(Parser)]
#[command(name = "cityhom-api")]
#[command(about = "CityHom property-rental marketplace API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to bind, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create tables and indexes, then exit")]
    Migrate,

    #[command(about = "Check a running server's /health endpoint")]
    Ping {
        #[arg(default_value = "http://localhost:8000", help = "Server base URL")]
        url: String,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => migrate(&config).await,
        Commands::Ping { url } => ping(&url).await,
    }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if config.database.url.is_none() {
        anyhow::ensure!(config.is_development(), "DATABASE_URL is required outside development");
        tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let manager = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        manager.migrate().await?;
    }
    Ok(Arc::new(PgDocumentStore::new(manager.pool())))
}

async fn serve(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }
    config.validate()?;

    let store = open_store(&config).await?;
    let storage = Arc::new(S3Storage::new(config.storage.clone()));
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));
    let state = AppState::new(store, storage, config);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("CityHom API listening on http://{}", bind_addr);

    axum::serve(listener, app(state).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config.database).await?;
    manager.migrate().await?;
    manager.close().await;
    tracing::info!("Migrations applied");
    Ok(())
}

async fn ping(url: &str) -> anyhow::Result<()> {
    let health = format!("{}/health", url.trim_end_matches('/'));
    let response = reqwest::get(&health).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    println!("{} {}", status, body);
    anyhow::ensure!(status.is_success(), "server at {} is unhealthy", url);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
