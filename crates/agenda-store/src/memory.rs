//! Process-local store backed by a vector.

use std::collections::HashSet;

use agenda_core::types::{Event, EventId, EventTemplate};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::{EventStore, StoreFuture};

#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Creates a store pre-populated with `events`, keeping their ids.
    #[must_use]
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }
}

pub(crate) fn assign_id(template: EventTemplate) -> Event {
    Event::new(uuid::Uuid::now_v7(), template)
}

pub(crate) fn replace(events: &mut [Event], id: EventId, template: EventTemplate) -> StoreResult<Event> {
    let slot = events
        .iter_mut()
        .find(|event| event.id == id)
        .ok_or(StoreError::NotFound(id))?;
    slot.details = template;
    Ok(slot.clone())
}

pub(crate) fn remove(events: &mut Vec<Event>, ids: &[EventId]) -> StoreResult<()> {
    if let Some(missing) = ids
        .iter()
        .find(|id| !events.iter().any(|event| event.id == **id))
    {
        return Err(StoreError::NotFound(*missing));
    }

    let ids: HashSet<&EventId> = ids.iter().collect();
    events.retain(|event| !ids.contains(&event.id));
    Ok(())
}

impl EventStore for MemoryStore {
    fn list(&self) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move { Ok(self.events.read().await.clone()) })
    }

    #[tracing::instrument(skip(self, template), fields(title = %template.title, date = %template.date))]
    fn create_one(&self, template: EventTemplate) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            let event = assign_id(template);
            self.events.write().await.push(event.clone());
            tracing::debug!(id = %event.id, "Event created");
            Ok(event)
        })
    }

    #[tracing::instrument(skip(self, templates), fields(count = templates.len()))]
    fn create_many(&self, templates: Vec<EventTemplate>) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let created: Vec<Event> = templates.into_iter().map(assign_id).collect();
            self.events.write().await.extend(created.iter().cloned());
            tracing::debug!(count = created.len(), "Events created");
            Ok(created)
        })
    }

    #[tracing::instrument(skip(self, template))]
    fn update_one(&self, id: EventId, template: EventTemplate) -> StoreFuture<'_, Event> {
        Box::pin(async move { replace(&mut self.events.write().await, id, template) })
    }

    #[tracing::instrument(skip(self))]
    fn delete_one(&self, id: EventId) -> StoreFuture<'_, ()> {
        Box::pin(async move { remove(&mut *self.events.write().await, &[id]) })
    }

    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    fn delete_many(&self, ids: Vec<EventId>) -> StoreFuture<'_, ()> {
        Box::pin(async move { remove(&mut *self.events.write().await, &ids) })
    }
}
