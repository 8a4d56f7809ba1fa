use thiserror::Error;

use agenda_core::types::{Event, EventId};

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RuleError(#[from] agenda_rules::error::RuleError),

    #[error(transparent)]
    StoreError(#[from] agenda_store::error::StoreError),

    #[error(transparent)]
    CoreError(#[from] agenda_core::error::CoreError),

    #[error("Not found: {0}")]
    NotFound(EventId),

    #[error("Conflict: overlaps {} existing event(s)", .0.len())]
    ConflictDetected(Vec<Event>),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
