//! In-memory event repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::event::{check_uniqueness, Event, EventId, EventRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of EventRepository
///
/// The write lock is held across the uniqueness check and the insert or
/// replace it guards.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<EventId, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Event>, DomainError> {
        let events = self.events.read().await;

        let mut owned: Vec<Event> = events
            .values()
            .filter(|e| e.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(Event::natural_cmp);

        Ok(owned)
    }

    async fn get(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn create(&self, event: Event) -> Result<Event, DomainError> {
        let mut events = self.events.write().await;

        if events.contains_key(event.id()) {
            return Err(DomainError::conflict(format!(
                "Event with ID '{}' already exists",
                event.id()
            )));
        }

        check_uniqueness(&event, events.values())?;

        events.insert(*event.id(), event.clone());
        Ok(event)
    }

    async fn update(&self, event: &Event) -> Result<Event, DomainError> {
        let mut events = self.events.write().await;

        if !events
            .get(event.id())
            .is_some_and(|stored| stored.owner() == event.owner())
        {
            return Err(DomainError::not_found(format!(
                "Event '{}' not found",
                event.id()
            )));
        }

        check_uniqueness(event, events.values())?;

        events.insert(*event.id(), event.clone());
        Ok(event.clone())
    }

    async fn delete(&self, id: &EventId, owner: &UserId) -> Result<bool, DomainError> {
        let mut events = self.events.write().await;

        if !events.get(id).is_some_and(|e| e.is_owned_by(owner)) {
            return Ok(false);
        }

        Ok(events.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.events.read().await.len())
    }
}
