use chrono::NaiveDate;

/// Ceiling applied to repeating events that carry no explicit end date.
///
/// This is a fixed date and is never derived from the current time.
pub const DEFAULT_REPEAT_END_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 30) {
    Some(date) => date,
    None => panic!("invalid default repeat end date"),
};

/// Interval between two notification scans when none is configured.
pub const DEFAULT_NOTIFIER_TICK_MILLIS: u64 = 1000;

/// Events document written when no storage path is configured.
pub const DEFAULT_STORAGE_PATH: &str = "events.json";
