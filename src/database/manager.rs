use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::store::Collection;
use crate::config::DatabaseConfig;
use crate::filter::FilterError;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Duplicate value for unique field {field}")]
    Duplicate { field: String },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the Postgres pool and the schema
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let raw = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(raw)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        info!(
            "Connected to database {}:{}{}",
            url.host_str().unwrap_or("localhost"),
            url.port().unwrap_or(5432),
            url.path()
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Idempotent schema setup: one JSONB table per collection plus unique indexes
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in migration_statements() {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        info!("Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

fn migration_statements() -> Vec<String> {
    let mut statements = Vec::new();
    for collection in Collection::ALL {
        let table = collection.table();
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id          UUID PRIMARY KEY,
                doc         JSONB NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
        ));
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_created ON {table} (created_at)"
        ));
        if collection != Collection::Users && collection != Collection::Addresses {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_owner ON {table} ((doc->>'userId'))"
            ));
        }
        for field in collection.unique_fields() {
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {table} ((doc->>'{field}'))",
                collection.unique_index(field)
            ));
        }
    }
    statements
}
