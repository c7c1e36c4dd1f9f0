//! PostgreSQL connection pooling

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL connection settings (`[database]` config section)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// Database connection URL; falls back to `DATABASE_URL` when empty
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Configured URL, or the `DATABASE_URL` environment variable
    pub fn resolved_url(&self) -> Result<String, DomainError> {
        if !self.url.is_empty() {
            return Ok(self.url.clone());
        }

        std::env::var("DATABASE_URL").map_err(|_| {
            DomainError::configuration(
                "database.url is not set and DATABASE_URL environment variable is missing",
            )
        })
    }
}

/// Open a connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let url = config.resolved_url()?;

    info!(max_connections = config.max_connections, "Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    info!("PostgreSQL connection established");

    Ok(pool)
}

/// Whether a driver error is a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
