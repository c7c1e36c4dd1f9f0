//! Application state for shared services

use std::sync::Arc;

use crate::domain::event::{Event, EventFields, EventId, EventPatch, EventRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::event::EventService;
use crate::infrastructure::user::{CreateUserRequest, PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub event_service: Arc<dyn EventServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        event_service: Arc<dyn EventServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            event_service,
            jwt_service,
        }
    }
}

/// Trait for user account operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn suspend(&self, username: &str) -> Result<User, DomainError>;
    async fn activate(&self, username: &str) -> Result<User, DomainError>;
    async fn set_password(&self, username: &str, password: &str) -> Result<User, DomainError>;
}

/// Trait for owner-scoped event operations
#[async_trait::async_trait]
pub trait EventServiceTrait: Send + Sync {
    async fn list(&self, owner: &UserId) -> Result<Vec<Event>, DomainError>;
    async fn create(&self, owner: &UserId, fields: EventFields) -> Result<Event, DomainError>;
    async fn get(&self, owner: &UserId, id: &EventId) -> Result<Event, DomainError>;
    async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        fields: EventFields,
    ) -> Result<Event, DomainError>;
    async fn partial_update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: EventPatch,
    ) -> Result<Event, DomainError>;
    async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn suspend(&self, username: &str) -> Result<User, DomainError> {
        UserService::suspend(self, username).await
    }

    async fn activate(&self, username: &str) -> Result<User, DomainError> {
        UserService::activate(self, username).await
    }

    async fn set_password(&self, username: &str, password: &str) -> Result<User, DomainError> {
        UserService::set_password(self, username, password).await
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + 'static> EventServiceTrait for EventService<R> {
    async fn list(&self, owner: &UserId) -> Result<Vec<Event>, DomainError> {
        EventService::list(self, owner).await
    }

    async fn create(&self, owner: &UserId, fields: EventFields) -> Result<Event, DomainError> {
        EventService::create(self, owner, fields).await
    }

    async fn get(&self, owner: &UserId, id: &EventId) -> Result<Event, DomainError> {
        EventService::get(self, owner, id).await
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        fields: EventFields,
    ) -> Result<Event, DomainError> {
        EventService::update(self, owner, id, fields).await
    }

    async fn partial_update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: EventPatch,
    ) -> Result<Event, DomainError> {
        EventService::partial_update(self, owner, id, patch).await
    }

    async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), DomainError> {
        EventService::delete(self, owner, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        EventService::count(self).await
    }
}
