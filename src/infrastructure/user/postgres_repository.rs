//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRepository, UserStatus};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const USER_COLUMNS: &str =
    "id, username, password_hash, status, created_at, updated_at, last_login_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        bind: impl Into<UserLookup>,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, clause);
        let query = sqlx::query(&sql);

        let query = match bind.into() {
            UserLookup::Id(id) => query.bind(id),
            UserLookup::Username(username) => query.bind(username),
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

enum UserLookup {
    Id(Uuid),
    Username(String),
}

impl From<&UserId> for UserLookup {
    fn from(id: &UserId) -> Self {
        Self::Id(*id.as_uuid())
    }
}

impl From<&str> for UserLookup {
    fn from(username: &str) -> Self {
        Self::Username(username.to_string())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("id = $1", id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, status,
                               created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.status().as_str())
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Username '{}' already exists", user.username()))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, status = $4,
                updated_at = $5, last_login_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.status().as_str())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Username '{}' already exists", user.username()))
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id())));
        }

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Malformed user row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read)?;
    let status: String = row.try_get("status").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read)?;

    Ok(User::restore(
        UserId::from_uuid(id),
        row.try_get("username").map_err(read)?,
        row.try_get("password_hash").map_err(read)?,
        UserStatus::from_db(&status),
        created_at,
        updated_at,
        row.try_get("last_login_at").map_err(read)?,
    ))
}
