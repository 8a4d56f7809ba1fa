//! "Starting soon" notification timing.
//!
//! `scan` is a pure function of `(now, events, notified)`; the caller keeps
//! the notified-id set between scans so each event fires once per session.

use std::collections::HashSet;

use agenda_core::types::{Event, EventId};
use chrono::{NaiveDateTime, TimeDelta};

/// An event that has entered its notification window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub event_id: EventId,
    pub title: String,
    pub starts_at: NaiveDateTime,
    /// The event's configured lead time in minutes.
    pub lead_minutes: u32,
}

impl Notification {
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} starts in {} minutes", self.title, self.lead_minutes)
    }
}

/// Result of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Events that became due during this scan, in input order.
    pub due: Vec<Notification>,
    /// The input notified set extended with every id in `due`.
    pub notified: HashSet<EventId>,
}

/// ## Summary
/// Returns the events whose start lies within their notification lead time
/// of `now` and that have not been notified yet.
///
/// An event is due when `0 <= start - now <= notification_time` minutes,
/// compared on the full duration so sub-second offsets count. Events with
/// `notification_time == 0` never fire and events that already started are
/// skipped.
#[must_use]
pub fn scan(now: NaiveDateTime, events: &[Event], notified: &HashSet<EventId>) -> ScanOutcome {
    let mut notified = notified.clone();
    let mut due = Vec::new();

    for event in events {
        let lead_minutes = event.details.notification_time;
        if lead_minutes == 0 || notified.contains(&event.id) {
            continue;
        }

        let starts_at = event.starts_at();
        let until_start = starts_at - now;
        let lead = TimeDelta::minutes(lead_minutes.into());
        if until_start < TimeDelta::zero() || until_start > lead {
            continue;
        }

        tracing::debug!(
            event_id = %event.id,
            title = %event.details.title,
            seconds_until_start = until_start.num_seconds(),
            "Event is starting soon"
        );
        notified.insert(event.id);
        due.push(Notification {
            event_id: event.id,
            title: event.details.title.clone(),
            starts_at,
            lead_minutes,
        });
    }

    ScanOutcome { due, notified }
}
