//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Server-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its textual form
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user id", value)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// Parse a stored status; unknown values fall back to `Suspended`
    pub fn from_db(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Suspended,
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user
    pub fn new(id: UserId, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rebuild a user from persisted columns
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        username: String,
        password_hash: String,
        status: UserStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            status,
            created_at,
            updated_at,
            last_login_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
        self.touch();
    }

    pub fn activate(&mut self) {
        if self.status == UserStatus::Suspended {
            self.status = UserStatus::Active;
            self.touch();
        }
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
