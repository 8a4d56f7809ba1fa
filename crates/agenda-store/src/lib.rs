//! Event persistence: the store interface consumed by the service layer and
//! the bundled in-memory and JSON-file implementations.

use std::future::Future;
use std::pin::Pin;

use agenda_core::types::{Event, EventId, EventTemplate};

use crate::error::StoreResult;

pub mod error;
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Persistence collaborator for events.
///
/// Every call is a complete logical operation; implementations assign ids on
/// create and never partially apply a batch.
pub trait EventStore: Send + Sync {
    /// Fetches every stored event.
    fn list(&self) -> StoreFuture<'_, Vec<Event>>;

    /// Persists one event and returns it with its assigned id.
    fn create_one(&self, template: EventTemplate) -> StoreFuture<'_, Event>;

    /// Persists a batch of events (a repeating series) as one call.
    fn create_many(&self, templates: Vec<EventTemplate>) -> StoreFuture<'_, Vec<Event>>;

    /// Replaces the stored data of `id`.
    fn update_one(&self, id: EventId, template: EventTemplate) -> StoreFuture<'_, Event>;

    /// Removes `id`.
    fn delete_one(&self, id: EventId) -> StoreFuture<'_, ()>;

    /// Removes every id in `ids` as one call.
    fn delete_many(&self, ids: Vec<EventId>) -> StoreFuture<'_, ()>;
}
