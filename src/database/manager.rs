use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::postgres::PgStore;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Row serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connects and prepares the Postgres store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a connection pool sized from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<PgStore, DatabaseError> {
        let url = Self::database_url(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&url)
            .await?;

        info!(
            "Created database pool (max_connections={})",
            config.max_connections
        );
        Ok(PgStore::new(pool))
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(store: &PgStore) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(store.pool()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    fn database_url(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        config
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))
    }
}
