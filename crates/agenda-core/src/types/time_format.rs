//! `HH:MM` serialization for [`NaiveTime`] fields.
//!
//! Times are written as `HH:MM` unless they carry seconds, in which case
//! `HH:MM:SS` is written so a rewrite of the events file keeps them.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";
const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// ## Summary
/// Serializes a time as `HH:MM`, or `HH:MM:SS` when the seconds are non-zero.
///
/// ## Errors
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*time))
}

#[must_use]
pub fn format(time: NaiveTime) -> String {
    let pattern = if time.second() == 0 {
        FORMAT
    } else {
        FORMAT_WITH_SECONDS
    };
    time.format(pattern).to_string()
}

/// ## Summary
/// Deserializes a time from `HH:MM` or `HH:MM:SS`.
///
/// ## Errors
/// Returns a deserialization error if the string matches neither format.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// ## Summary
/// Parses `HH:MM` or `HH:MM:SS`.
///
/// ## Errors
/// Returns a `chrono` parse error when the input is not a valid time of day.
pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw.trim(), FORMAT)
        .or_else(|_err| NaiveTime::parse_from_str(raw.trim(), FORMAT_WITH_SECONDS))
}
