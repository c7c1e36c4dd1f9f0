//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Look up a user by username (for login)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user; duplicate usernames are a conflict
    async fn create(&self, user: User) -> Result<User, DomainError>;

    async fn update(&self, user: &User) -> Result<User, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;
}
