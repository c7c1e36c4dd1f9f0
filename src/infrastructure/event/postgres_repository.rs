//! PostgreSQL event repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::event::{check_uniqueness, Event, EventId, EventRepository, EventValidationError};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const EVENT_COLUMNS: &str = "id, owner_id, day_of_week, start_time, finish_time, title, \
                             description, created_ts, modified_ts";

/// PostgreSQL implementation of EventRepository
///
/// Writes lock the owner's rows in the target slot before checking
/// uniqueness; the table's unique constraint catches whatever slips past.
#[derive(Debug, Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
    }

    /// Rows sharing the candidate's slot, locked until the transaction ends
    async fn lock_slot(
        tx: &mut Transaction<'static, Postgres>,
        event: &Event,
    ) -> Result<Vec<Event>, DomainError> {
        let sql = format!(
            "SELECT {} FROM events \
             WHERE owner_id = $1 AND day_of_week = $2 AND start_time = $3 AND title = $4 \
             FOR UPDATE",
            EVENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(event.owner().as_uuid())
            .bind(event.day_of_week())
            .bind(event.start_time())
            .bind(event.title())
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check event slot: {}", e)))?;

        rows.iter().map(row_to_event).collect()
    }
}

fn write_error(action: &str, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        EventValidationError::Duplicate.into()
    } else {
        DomainError::storage(format!("Failed to {} event: {}", action, e))
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Event>, DomainError> {
        let sql = format!(
            "SELECT {} FROM events WHERE owner_id = $1 \
             ORDER BY day_of_week, start_time, finish_time, title",
            EVENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(owner.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list events: {}", e)))?;

        rows.iter().map(row_to_event).collect()
    }

    async fn get(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get event: {}", e)))?;

        row.as_ref().map(row_to_event).transpose()
    }

    async fn create(&self, event: Event) -> Result<Event, DomainError> {
        let mut tx = self.begin().await?;

        let slot = Self::lock_slot(&mut tx, &event).await?;
        check_uniqueness(&event, &slot)?;

        sqlx::query(
            r#"
            INSERT INTO events (id, owner_id, day_of_week, start_time, finish_time,
                                title, description, created_ts, modified_ts)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.owner().as_uuid())
        .bind(event.day_of_week())
        .bind(event.start_time())
        .bind(event.finish_time())
        .bind(event.title())
        .bind(event.description())
        .bind(event.created_ts())
        .bind(event.modified_ts())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("create", e))?;

        tx.commit().await.map_err(|e| write_error("create", e))?;

        Ok(event)
    }

    async fn update(&self, event: &Event) -> Result<Event, DomainError> {
        let mut tx = self.begin().await?;

        let slot = Self::lock_slot(&mut tx, event).await?;
        check_uniqueness(event, &slot)?;

        let result = sqlx::query(
            r#"
            UPDATE events
            SET day_of_week = $3, start_time = $4, finish_time = $5,
                title = $6, description = $7, modified_ts = $8
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.owner().as_uuid())
        .bind(event.day_of_week())
        .bind(event.start_time())
        .bind(event.finish_time())
        .bind(event.title())
        .bind(event.description())
        .bind(event.modified_ts())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Event '{}' not found", event.id())));
        }

        tx.commit().await.map_err(|e| write_error("update", e))?;

        Ok(event.clone())
    }

    async fn delete(&self, id: &EventId, owner: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count events: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_event(row: &PgRow) -> Result<Event, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Malformed event row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read)?;
    let owner_id: Uuid = row.try_get("owner_id").map_err(read)?;
    let start_time: NaiveTime = row.try_get("start_time").map_err(read)?;
    let finish_time: NaiveTime = row.try_get("finish_time").map_err(read)?;
    let created_ts: DateTime<Utc> = row.try_get("created_ts").map_err(read)?;
    let modified_ts: DateTime<Utc> = row.try_get("modified_ts").map_err(read)?;

    Ok(Event::restore(
        EventId::from_uuid(id),
        UserId::from_uuid(owner_id),
        row.try_get("day_of_week").map_err(read)?,
        start_time,
        finish_time,
        row.try_get("title").map_err(read)?,
        row.try_get("description").map_err(read)?,
        created_ts,
        modified_ts,
    ))
}
