//! Event repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Event, EventId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage for weekly events
///
/// Implementations must run the uniqueness rule (`check_uniqueness`) and the
/// write it guards atomically, so two concurrent writes from one owner cannot
/// both claim the same slot.
#[async_trait]
pub trait EventRepository: Send + Sync + Debug {
    /// Events owned by `owner`, in natural order
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Event>, DomainError>;

    /// Load an event regardless of owner
    async fn get(&self, id: &EventId) -> Result<Option<Event>, DomainError>;

    async fn create(&self, event: Event) -> Result<Event, DomainError>;

    /// Persist new values; the row must still belong to `event.owner()`
    async fn update(&self, event: &Event) -> Result<Event, DomainError>;

    /// Delete an event of `owner`, returning whether a row went away
    async fn delete(&self, id: &EventId, owner: &UserId) -> Result<bool, DomainError>;

    /// Total number of stored events (readiness check)
    async fn count(&self) -> Result<usize, DomainError>;
}
