//! Store persisted as a single JSON document of the form `{"events": [...]}`.
//!
//! Every mutation reads the document, applies the change, and rewrites the
//! file through a temporary sibling so a failed write leaves the previous
//! document in place. A missing file is an empty calendar.

use std::path::{Path, PathBuf};

use agenda_core::types::{Event, EventId, EventTemplate};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::memory::{assign_id, remove, replace};
use crate::{EventStore, StoreFuture};

#[derive(Debug, Default, Serialize, Deserialize)]
struct EventDocument {
    events: Vec<Event>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StoreResult<EventDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(EventDocument::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Events file missing, starting empty");
                Ok(EventDocument::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_document(&self, document: &EventDocument) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");

        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        tracing::trace!(path = %self.path.display(), events = document.events.len(), "Events file written");
        Ok(())
    }

    async fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<Event>) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let result = change(&mut document.events)?;
        self.write_document(&document).await?;
        Ok(result)
    }
}

impl EventStore for JsonFileStore {
    fn list(&self) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move { Ok(self.read_document().await?.events) })
    }

    #[tracing::instrument(skip(self, template), fields(path = %self.path.display(), title = %template.title))]
    fn create_one(&self, template: EventTemplate) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            let event = assign_id(template);
            let stored = event.clone();
            self.modify(move |events| {
                events.push(stored);
                Ok(())
            })
            .await?;
            Ok(event)
        })
    }

    #[tracing::instrument(skip(self, templates), fields(path = %self.path.display(), count = templates.len()))]
    fn create_many(&self, templates: Vec<EventTemplate>) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let created: Vec<Event> = templates.into_iter().map(assign_id).collect();
            let stored = created.clone();
            self.modify(move |events| {
                events.extend(stored);
                Ok(())
            })
            .await?;
            Ok(created)
        })
    }

    #[tracing::instrument(skip(self, template), fields(path = %self.path.display()))]
    fn update_one(&self, id: EventId, template: EventTemplate) -> StoreFuture<'_, Event> {
        Box::pin(async move { self.modify(move |events| replace(events, id, template)).await })
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn delete_one(&self, id: EventId) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.modify(move |events| remove(events, &[id])).await })
    }

    #[tracing::instrument(skip(self, ids), fields(path = %self.path.display(), count = ids.len()))]
    fn delete_many(&self, ids: Vec<EventId>) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.modify(move |events| remove(events, &ids)).await })
    }
}
