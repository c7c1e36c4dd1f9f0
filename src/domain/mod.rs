//! Domain layer - Core business logic and entities

pub mod error;
pub mod event;
pub mod user;

pub use error::DomainError;
pub use event::{Event, EventFields, EventId, EventPatch, EventRepository};
pub use user::{User, UserId, UserRepository, UserStatus};
