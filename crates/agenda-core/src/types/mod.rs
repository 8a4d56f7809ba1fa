//! Calendar event data model shared by every layer.

mod event;
mod repeat;
pub mod time_format;

pub use event::{Event, EventId, EventTemplate, SeriesId, TimeSlot};
pub use repeat::{RepeatRule, RepeatType};
