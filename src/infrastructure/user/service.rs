//! User service for authentication and account management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_password, validate_username, User, UserId, UserRepository, UserValidationError,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

fn invalid(err: UserValidationError) -> DomainError {
    DomainError::field_validation(err.field(), err.to_string())
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account with a hashed password
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(invalid)?;
        validate_password(&request.password).map_err(invalid)?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(UserId::generate(), &request.username, password_hash);

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), username = %user.username(), "User created");

        Ok(user)
    }

    /// Check credentials; `None` for unknown users, wrong passwords and
    /// suspended accounts alike
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            debug!(username = %username, "Login for unknown user");
            return Ok(None);
        };

        if !user.is_active() || !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Login rejected");
            return Ok(None);
        }

        self.repository.record_login(user.id()).await?;
        self.repository.get(user.id()).await
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    pub async fn suspend(&self, username: &str) -> Result<User, DomainError> {
        let mut user = self.require_by_username(username).await?;
        user.suspend();
        self.repository.update(&user).await
    }

    pub async fn activate(&self, username: &str) -> Result<User, DomainError> {
        let mut user = self.require_by_username(username).await?;
        user.activate();
        self.repository.update(&user).await
    }

    /// Replace a user's password after checking the new one
    pub async fn set_password(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_password(password).map_err(invalid)?;

        let mut user = self.require_by_username(username).await?;
        user.set_password_hash(self.hasher.hash(password)?);

        let user = self.repository.update(&user).await?;
        info!(user_id = %user.id(), "Password changed");

        Ok(user)
    }

    async fn require_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.repository
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))
    }
}
