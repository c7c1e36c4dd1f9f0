//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username() == username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if users.values().any(|u| u.username() == user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        users.insert(*user.id(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        let Some(slot) = users.get_mut(user.id()) else {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id())));
        };

        *slot = user.clone();
        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(id) {
            Some(user) => {
                user.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", id))),
        }
    }
}
