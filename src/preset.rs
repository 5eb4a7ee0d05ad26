//! Named date range presets.
//!
//! Presets resolve against an explicit anchor day so results are
//! deterministic. [`today_utc`] supplies the anchor from the system clock.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{add_months, YearMonth};
use crate::date_range::DateRange;
use crate::error::{Error, Result};

/// Today's calendar day in UTC.
///
/// UTC is the single reference timezone for every preset so local and UTC
/// midnights never disagree about which day it is.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Preset shortcuts offered next to the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// Today only
    #[default]
    Today,
    /// Last 7 days including today
    Last7,
    /// Last 30 days including today
    Last30,
    /// First of the current month through today
    ThisMonth,
    /// The whole previous calendar month
    PrevMonth,
}

impl Preset {
    /// Resolve to a concrete range anchored at `today`.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            Self::Today => DateRange::between(today, today),
            Self::Last7 => DateRange::between(today - Duration::days(6), today),
            Self::Last30 => DateRange::between(today - Duration::days(29), today),
            Self::ThisMonth => DateRange::between(YearMonth::of(today).first_day(), today),
            Self::PrevMonth => {
                let prev = add_months(YearMonth::of(today), -1);
                DateRange::between(prev.first_day(), prev.last_day())
            }
        }
    }

    /// Wire key, e.g. `last7` or `thisMonth`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last7 => "last7",
            Self::Last30 => "last30",
            Self::ThisMonth => "thisMonth",
            Self::PrevMonth => "prevMonth",
        }
    }

    /// Get display name for the preset.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Last7 => "Last 7 days",
            Self::Last30 => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::PrevMonth => "Previous month",
        }
    }

    /// Get all presets in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Today,
            Self::Last7,
            Self::Last30,
            Self::ThisMonth,
            Self::PrevMonth,
        ]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Preset {
    type Err = Error;

    /// Accepts the wire keys case-insensitively, ignoring `-` and `_`, so
    /// `thisMonth`, `this-month` and `THIS_MONTH` are the same preset.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        Self::all()
            .iter()
            .copied()
            .find(|p| p.key().to_lowercase() == normalized)
            .ok_or_else(|| Error::InvalidPreset(s.to_string()))
    }
}

/// Parse `key` and resolve it against `today`.
pub fn resolve_preset(key: &str, today: NaiveDate) -> Result<DateRange> {
    Ok(key.parse::<Preset>()?.resolve(today))
}
