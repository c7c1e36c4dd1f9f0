//! User domain
//!
//! Accounts that own weekly events and authenticate against the token
//! endpoints.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserStatus};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_username, UserValidationError};
