//! Event entity and input shapes

use std::cmp::Ordering;

use chrono::{DateTime, NaiveTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidFields;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Server-assigned event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier taken from a request path
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid event id", value)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete set of client-controlled values, as sent on create or full update
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub finish_time: NaiveTime,
    pub title: String,
    pub description: String,
}

/// Partial update: `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub day_of_week: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub finish_time: Option<NaiveTime>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EventPatch {
    /// Effective values after backfilling unsupplied fields from `stored`
    pub fn resolve(self, stored: &Event) -> EventFields {
        EventFields {
            day_of_week: self.day_of_week.unwrap_or(i64::from(stored.day_of_week)),
            start_time: self.start_time.unwrap_or(stored.start_time),
            finish_time: self.finish_time.unwrap_or(stored.finish_time),
            title: self.title.unwrap_or_else(|| stored.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| stored.description.clone()),
        }
    }
}

/// Current time at the microsecond precision storage keeps
fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A weekly recurring event owned by one user
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    owner: UserId,
    day_of_week: i16,
    start_time: NaiveTime,
    finish_time: NaiveTime,
    title: String,
    description: String,
    created_ts: DateTime<Utc>,
    modified_ts: DateTime<Utc>,
}

impl Event {
    /// Create a new event for `owner`; the owner always comes from the caller
    pub fn new(owner: UserId, fields: ValidFields) -> Self {
        let now = timestamp_now();

        Self {
            id: EventId::generate(),
            owner,
            day_of_week: fields.day_of_week,
            start_time: fields.start_time,
            finish_time: fields.finish_time,
            title: fields.title,
            description: fields.description,
            created_ts: now,
            modified_ts: now,
        }
    }

    /// Rebuild an event from persisted columns
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: EventId,
        owner: UserId,
        day_of_week: i16,
        start_time: NaiveTime,
        finish_time: NaiveTime,
        title: String,
        description: String,
        created_ts: DateTime<Utc>,
        modified_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            day_of_week,
            start_time,
            finish_time,
            title,
            description,
            created_ts,
            modified_ts,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn day_of_week(&self) -> i16 {
        self.day_of_week
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn finish_time(&self) -> NaiveTime {
        self.finish_time
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_ts(&self) -> DateTime<Utc> {
        self.created_ts
    }

    pub fn modified_ts(&self) -> DateTime<Utc> {
        self.modified_ts
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Replace every client-controlled value; id, owner and `created_ts` stay
    pub fn apply(&mut self, fields: ValidFields) {
        self.day_of_week = fields.day_of_week;
        self.start_time = fields.start_time;
        self.finish_time = fields.finish_time;
        self.title = fields.title;
        self.description = fields.description;
        self.modified_ts = timestamp_now();
    }

    /// Listing order: day of week, start, finish, then title
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        self.day_of_week
            .cmp(&other.day_of_week)
            .then(self.start_time.cmp(&other.start_time))
            .then(self.finish_time.cmp(&other.finish_time))
            .then_with(|| self.title.cmp(&other.title))
    }

    /// Whether `other` occupies the same `(owner, day, start, title)` slot
    pub fn collides_with(&self, other: &Self) -> bool {
        self.id != other.id
            && self.owner == other.owner
            && self.day_of_week == other.day_of_week
            && self.start_time == other.start_time
            && self.title == other.title
    }
}
