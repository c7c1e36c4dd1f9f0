//! Event service: owner-scoped scheduling operations

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::event::{validate_fields, Event, EventFields, EventId, EventPatch, EventRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Owner-scoped CRUD over weekly events
///
/// Every operation takes the authenticated user; events of other users are
/// visible only as `Forbidden`.
#[derive(Debug)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Events owned by `owner` in natural order
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Event>, DomainError> {
        let events = self.repository.list_for_owner(owner).await?;
        debug!(owner = %owner, count = events.len(), "Listed events");
        Ok(events)
    }

    pub async fn create(&self, owner: &UserId, fields: EventFields) -> Result<Event, DomainError> {
        let valid = validate_fields(fields)?;
        let event = self.repository.create(Event::new(*owner, valid)).await?;

        info!(event_id = %event.id(), owner = %owner, "Event created");
        Ok(event)
    }

    /// Load an event, failing with `NotFound` or `Forbidden`
    pub async fn get(&self, owner: &UserId, id: &EventId) -> Result<Event, DomainError> {
        let event = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Event '{}' not found", id)))?;

        if !event.is_owned_by(owner) {
            debug!(event_id = %id, user = %owner, "Access to foreign event denied");
            return Err(DomainError::forbidden(
                "You do not have permission to perform this action",
            ));
        }

        Ok(event)
    }

    /// Replace every client-controlled value
    pub async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        fields: EventFields,
    ) -> Result<Event, DomainError> {
        let event = self.get(owner, id).await?;
        self.save(event, fields).await
    }

    /// Merge supplied values over the stored ones, then validate the result
    pub async fn partial_update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: EventPatch,
    ) -> Result<Event, DomainError> {
        let event = self.get(owner, id).await?;
        let fields = patch.resolve(&event);

        self.save(event, fields).await
    }

    async fn save(&self, mut event: Event, fields: EventFields) -> Result<Event, DomainError> {
        event.apply(validate_fields(fields)?);
        let event = self.repository.update(&event).await?;

        info!(event_id = %event.id(), "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), DomainError> {
        self.get(owner, id).await?;

        if !self.repository.delete(id, owner).await? {
            return Err(DomainError::not_found(format!("Event '{}' not found", id)));
        }

        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
