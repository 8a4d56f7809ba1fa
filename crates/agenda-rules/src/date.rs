//! Calendar stepping helpers.
//!
//! `add_months` follows chrono and clamps to the last day of a shorter month;
//! callers that need the exact day-of-month compare with `same_day_of_month`.

use chrono::{Datelike, Days, Months, NaiveDate};

/// ## Summary
/// Adds `days` calendar days, returning `None` past the representable range.
#[must_use]
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// ## Summary
/// Adds `months` calendar months, clamping the day to the target month length.
#[must_use]
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// ## Summary
/// Whole months from the month of `from` to the month of `to`; zero when
/// `to` is not after `from`.
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let span = (i64::from(to.year()) - i64::from(from.year())) * 12 + i64::from(to.month())
        - i64::from(from.month());
    u32::try_from(span.max(0)).unwrap_or(u32::MAX)
}

#[must_use]
pub fn same_day_of_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.day() == b.day()
}

#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
