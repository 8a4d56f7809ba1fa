use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Input rejected before any expansion or persistence happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Validation error: title must not be empty")]
    EmptyTitle,

    #[error("Validation error: start time {start} must be before end time {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("Validation error: repeat interval must be at least 1, got {0}")]
    InvalidInterval(u32),

    #[error("Validation error: repeat end date {end_date} is before the first occurrence {anchor}")]
    EndDateBeforeAnchor { anchor: NaiveDate, end_date: NaiveDate },
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;
