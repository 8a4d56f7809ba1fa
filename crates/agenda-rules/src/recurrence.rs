//! Expansion of a repeating event template into dated occurrences.
//!
//! Occurrences are stepped from the previously accepted date. Monthly and
//! yearly steps only accept a date whose day-of-month matches the previous
//! occurrence; months without that day (the 31st in a 30-day month, Feb 29 in
//! a common year) are skipped and the step is retried from the same source
//! date with a larger offset.

use agenda_core::constants::DEFAULT_REPEAT_END_DATE;
use agenda_core::types::{EventTemplate, RepeatType};
use chrono::NaiveDate;

use crate::date::{add_days, add_months, first_of_month, months_between, same_day_of_month};

/// ## Summary
/// Expands `template` up to its end date, using the fixed default ceiling when
/// the repeat rule has no end date.
#[must_use]
pub fn generate(template: &EventTemplate) -> Vec<EventTemplate> {
    generate_until(template, DEFAULT_REPEAT_END_DATE)
}

/// ## Summary
/// Expands `template` into its occurrences, ordered by ascending date.
///
/// A non-repeating template yields itself. A repeating template yields the
/// anchor occurrence followed by every stepped date up to and including the
/// rule's end date, or `fallback_end` when the rule has none. Every field
/// other than `date` is copied from the template.
///
/// Never fails: a zero interval or an unreachable day-of-month ends the
/// series with whatever occurrences were already accepted.
#[must_use]
#[tracing::instrument(skip(template), fields(
    title = %template.title,
    anchor = %template.date,
    repeat = %template.repeat.kind,
    interval = template.repeat.interval
))]
pub fn generate_until(template: &EventTemplate, fallback_end: NaiveDate) -> Vec<EventTemplate> {
    let repeat = &template.repeat;
    if !repeat.is_repeating() {
        return vec![template.clone()];
    }

    if repeat.interval == 0 {
        tracing::warn!("Repeating template has a zero interval, keeping only the anchor");
        return vec![template.clone()];
    }

    let end = repeat.effective_end_date_or(fallback_end);
    let occurrences: Vec<EventTemplate> =
        occurrence_dates(template.date, repeat.kind, repeat.interval, end)
            .into_iter()
            .map(|date| EventTemplate {
                date,
                ..template.clone()
            })
            .collect();

    tracing::debug!(end = %end, count = occurrences.len(), "Expanded repeating template");
    occurrences
}

/// ## Summary
/// Dates of every occurrence from `anchor` through `end`, anchor first.
#[must_use]
pub fn occurrence_dates(
    anchor: NaiveDate,
    kind: RepeatType,
    interval: u32,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = vec![anchor];
    if interval == 0 {
        return dates;
    }

    let mut current = anchor;
    while let Some(next) = next_date(current, kind, interval, end) {
        dates.push(next);
        current = next;
    }
    dates
}

fn next_date(
    current: NaiveDate,
    kind: RepeatType,
    interval: u32,
    end: NaiveDate,
) -> Option<NaiveDate> {
    let candidate = match kind {
        RepeatType::None => None,
        RepeatType::Daily => add_days(current, u64::from(interval)),
        RepeatType::Weekly => add_days(current, u64::from(interval) * 7),
        RepeatType::Monthly => step_months_keeping_day(current, interval, end),
        RepeatType::Yearly => step_months_keeping_day(current, interval.checked_mul(12)?, end),
    }?;

    (candidate <= end).then_some(candidate)
}

/// Steps `current` forward by multiples of `step` months until the target
/// month contains the same day-of-month. Bounded by the number of steps that
/// fit between `current` and `end`.
fn step_months_keeping_day(current: NaiveDate, step: u32, end: NaiveDate) -> Option<NaiveDate> {
    let max_attempts = months_between(current, end) / step + 1;

    for attempt in 1..=max_attempts {
        let candidate = add_months(current, step.checked_mul(attempt)?)?;
        if first_of_month(candidate) > end {
            break;
        }
        if same_day_of_month(candidate, current) {
            return Some(candidate);
        }
        tracing::trace!(source = %current, month = %first_of_month(candidate), "Month has no matching day, skipping");
    }

    tracing::trace!(source = %current, end = %end, "No matching day-of-month before end date");
    None
}
