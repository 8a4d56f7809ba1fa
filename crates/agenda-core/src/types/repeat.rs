use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REPEAT_END_DATE;
use crate::error::CoreError;

/// Frequency of a repeating event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    #[must_use]
    pub const fn is_repeating(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(CoreError::InvalidInput(format!(
                "unknown repeat type '{other}'"
            ))),
        }
    }
}

/// Repeat rule attached to an event template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    #[serde(rename = "type")]
    pub kind: RepeatType,
    /// Step count between occurrences. Ignored when `kind` is `None`.
    #[serde(default)]
    pub interval: u32,
    /// Last date an occurrence may fall on, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RepeatRule {
    /// A rule that produces a single occurrence.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RepeatType::None,
            interval: 0,
            end_date: None,
        }
    }

    #[must_use]
    pub const fn new(kind: RepeatType, interval: u32, end_date: Option<NaiveDate>) -> Self {
        Self {
            kind,
            interval,
            end_date,
        }
    }

    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.kind.is_repeating()
    }

    /// ## Summary
    /// Returns `end_date` when present, else `fallback`.
    #[must_use]
    pub fn effective_end_date_or(&self, fallback: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(fallback)
    }

    /// ## Summary
    /// Returns `end_date` when present, else the fixed default ceiling.
    #[must_use]
    pub fn effective_end_date(&self) -> NaiveDate {
        self.effective_end_date_or(DEFAULT_REPEAT_END_DATE)
    }
}

impl Default for RepeatRule {
    fn default() -> Self {
        Self::none()
    }
}
