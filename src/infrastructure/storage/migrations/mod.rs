//! Database migrations

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Executor;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Apply every pending migration
    async fn run(&self) -> Result<(), DomainError>;

    /// Revert the most recently applied migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Latest applied migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL applied when migrating up; may hold several statements
    pub up: String,
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Schema for users and their weekly events
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username VARCHAR(50) NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'active',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login_at TIMESTAMPTZ
            );
            "#,
            r#"
            DROP TABLE IF EXISTS users;
            "#,
        ),
        Migration::new(
            2,
            "Create events table",
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id UUID PRIMARY KEY,
                owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                day_of_week SMALLINT NOT NULL DEFAULT 0,
                start_time TIME NOT NULL,
                finish_time TIME NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_ts TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                modified_ts TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT events_day_of_week_range CHECK (day_of_week BETWEEN 0 AND 6),
                CONSTRAINT events_start_before_finish CHECK (start_time < finish_time),
                CONSTRAINT events_owner_slot_unique UNIQUE (owner_id, day_of_week, start_time, title)
            );
            CREATE INDEX IF NOT EXISTS idx_events_owner_order
                ON events(owner_id, day_of_week, start_time, finish_time, title);
            "#,
            r#"
            DROP TABLE IF EXISTS events;
            "#,
        ),
    ]
}

/// PostgreSQL migrator with a `_migrations` bookkeeping table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self::with_migrations(pool, schema_migrations())
    }

    pub fn with_migrations(pool: PgPool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Apply one migration and record it in the same transaction
    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        let fail = |e: sqlx::Error| {
            DomainError::storage(format!("Failed to run migration {}: {}", migration.version, e))
        };

        let mut tx = self.pool.begin().await.map_err(fail)?;

        tx.as_mut()
            .execute(sqlx::raw_sql(&migration.up))
            .await
            .map_err(fail)?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(fail)?;

        tx.commit().await.map_err(fail)?;

        info!(version = migration.version, description = %migration.description, "Applied migration");
        Ok(())
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        for migration in &self.migrations {
            if !self.is_applied(migration.version).await? {
                self.apply(migration).await?;
            }
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(version) = self.version().await? else {
            return Ok(());
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("Applied migration {} is unknown", version))
            })?;

        let fail = |e: sqlx::Error| {
            DomainError::storage(format!("Failed to revert migration {}: {}", version, e))
        };

        let mut tx = self.pool.begin().await.map_err(fail)?;

        tx.as_mut()
            .execute(sqlx::raw_sql(&migration.down))
            .await
            .map_err(fail)?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(fail)?;

        tx.commit().await.map_err(fail)?;

        info!(version, "Reverted migration");
        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Apply all pending schema migrations
pub async fn run_schema_migrations(pool: &PgPool) -> Result<(), DomainError> {
    PostgresMigrator::new(pool.clone()).run().await
}
