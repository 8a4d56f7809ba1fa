//! Time-overlap detection between a candidate and already stored events.

use agenda_core::types::{Event, EventId, EventTemplate};

/// ## Summary
/// Returns the events in `existing` that overlap `candidate`, in the order
/// they appear in `existing`.
///
/// Events whose id equals `exclude` are skipped so that an edited event is
/// not reported as conflicting with its own stored version.
#[must_use]
pub fn find_conflicts(
    candidate: &EventTemplate,
    existing: &[Event],
    exclude: Option<EventId>,
) -> Vec<Event> {
    find_series_conflicts(std::slice::from_ref(candidate), existing, |id| {
        exclude == Some(id)
    })
}

/// ## Summary
/// Returns the events in `existing` that overlap any of `occurrences`.
///
/// Each stored event is reported at most once and in `existing` order.
/// Occurrences are not compared with each other.
#[must_use]
pub fn find_series_conflicts(
    occurrences: &[EventTemplate],
    existing: &[Event],
    is_excluded: impl Fn(EventId) -> bool,
) -> Vec<Event> {
    let conflicts: Vec<Event> = existing
        .iter()
        .filter(|event| !is_excluded(event.id))
        .filter(|event| {
            let slot = event.slot();
            occurrences
                .iter()
                .any(|occurrence| occurrence.slot().overlaps(&slot))
        })
        .cloned()
        .collect();

    if !conflicts.is_empty() {
        tracing::debug!(
            occurrences = occurrences.len(),
            conflicts = conflicts.len(),
            "Overlapping events found"
        );
    }

    conflicts
}

/// ## Summary
/// Formats a conflicting event as `title (YYYY-MM-DD HH:MM-HH:MM)`.
#[must_use]
pub fn describe_conflict(event: &Event) -> String {
    let details = &event.details;
    format!(
        "{} ({} {}-{})",
        details.title,
        details.date.format("%Y-%m-%d"),
        details.start_time.format("%H:%M"),
        details.end_time.format("%H:%M")
    )
}
