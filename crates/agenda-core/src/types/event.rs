use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::repeat::RepeatRule;

/// Identity assigned to a stored event by the persistence layer.
pub type EventId = uuid::Uuid;

/// Identity shared by every occurrence produced from one expansion.
pub type SeriesId = uuid::Uuid;

/// Event data as submitted by a user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    pub title: String,
    /// Date of this occurrence (the anchor date for a repeating template).
    pub date: NaiveDate,
    #[serde(with = "super::time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "super::time_format")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatRule,
    /// Minutes before `start_time` to warn; `0` disables the warning.
    #[serde(default)]
    pub notification_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<SeriesId>,
}

impl EventTemplate {
    /// ## Summary
    /// Creates a non-repeating template with empty free-text fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            start_time,
            end_time,
            description: String::new(),
            location: String::new(),
            category: String::new(),
            repeat: RepeatRule::none(),
            notification_time: 0,
            series_id: None,
        }
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: RepeatRule) -> Self {
        self.repeat = repeat;
        self
    }

    #[must_use]
    pub fn with_notification_time(mut self, minutes: u32) -> Self {
        self.notification_time = minutes;
        self
    }

    #[must_use]
    pub fn with_details(
        mut self,
        description: impl Into<String>,
        location: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.location = location.into();
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    #[must_use]
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    #[must_use]
    pub const fn slot(&self) -> TimeSlot {
        TimeSlot {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// A stored event: the submitted template plus its persistence identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventTemplate,
}

impl Event {
    #[must_use]
    pub const fn new(id: EventId, details: EventTemplate) -> Self {
        Self { id, details }
    }

    #[must_use]
    pub const fn slot(&self) -> TimeSlot {
        self.details.slot()
    }

    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.details.starts_at()
    }

    #[must_use]
    pub const fn series_id(&self) -> Option<SeriesId> {
        self.details.series_id
    }
}

/// Half-open `[start, end)` time range on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// ## Summary
    /// Returns true when both slots fall on the same date and their ranges
    /// share a positive-length intersection. Touching ranges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}
