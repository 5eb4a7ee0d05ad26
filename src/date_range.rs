//! Date range selection.
//!
//! A [`DateRange`] is the value the picker hands to its host. It is built up
//! one day click at a time through [`DateRange::select`], which returns a new
//! value instead of mutating in place.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, parse_iso, to_iso};
use crate::error::{Error, Result};

/// Where a range is in the click-driven selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No endpoints set.
    Empty,
    /// Only the start is set; the next click closes the range.
    PartialStart,
    /// Both endpoints set, `from <= to`.
    Complete,
}

/// A calendar day range, possibly empty or half-open during selection.
///
/// Either both endpoints are empty, only `from` is set, or both are set with
/// `from <= to`. The constructors uphold this, so the fields stay private.
///
/// On the wire the range is `{"from": "YYYY-MM-DD", "to": "YYYY-MM-DD"}` with
/// an empty string standing for an unset endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeWire", into = "RangeWire")]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// The empty range (no selection).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// A range with only its start set.
    #[must_use]
    pub const fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// A complete range over two days given in either order.
    #[must_use]
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            from: Some(a.min(b)),
            to: Some(a.max(b)),
        }
    }

    /// Create a range from explicit endpoints.
    ///
    /// Fails when `to` is set without `from`, or when `from` is after `to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        match (from, to) {
            (None, Some(to)) => Err(Error::InvalidRange {
                from: String::new(),
                to: to_iso(to),
            }),
            (Some(f), Some(t)) if f > t => Err(Error::InvalidRange {
                from: to_iso(f),
                to: to_iso(t),
            }),
            _ => Ok(Self { from, to }),
        }
    }

    /// Parse a range from ISO strings, where an empty string means unset.
    pub fn from_iso(from: &str, to: &str) -> Result<Self> {
        let parse = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                parse_iso(s).map(Some)
            }
        };
        Self::new(parse(from)?, parse(to)?)
    }

    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Current position in the selection flow.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        match (self.from, self.to) {
            (Some(_), Some(_)) => SelectionState::Complete,
            (Some(_), None) => SelectionState::PartialStart,
            _ => SelectionState::Empty,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.state(), SelectionState::Complete)
    }

    /// Apply a day click and return the resulting range.
    ///
    /// An empty or complete range restarts at `day`. A partial range closes,
    /// swapping endpoints if `day` precedes the existing start.
    #[must_use]
    pub fn select(&self, day: NaiveDate) -> Self {
        match (self.from, self.to) {
            (Some(start), None) => Self::between(start, day),
            _ => Self::starting(day),
        }
    }

    /// Clear both endpoints.
    #[must_use]
    pub const fn reset(&self) -> Self {
        Self::empty()
    }

    /// True when `day` lies within a complete range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        calendar::in_range(day, self.from, self.to)
    }

    /// True when `day` is one of the set endpoints.
    #[must_use]
    pub fn is_edge(&self, day: NaiveDate) -> bool {
        calendar::same_day(Some(day), self.from) || calendar::same_day(Some(day), self.to)
    }

    /// Endpoints as ISO strings, empty for unset.
    #[must_use]
    pub fn to_iso_pair(&self) -> (String, String) {
        (
            self.from.map(to_iso).unwrap_or_default(),
            self.to.map(to_iso).unwrap_or_default(),
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |d: Option<NaiveDate>| d.map_or_else(|| "—".to_string(), to_iso);
        write!(f, "{} → {}", show(self.from), show(self.to))
    }
}

#[derive(Serialize, Deserialize)]
struct RangeWire {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

impl TryFrom<RangeWire> for DateRange {
    type Error = Error;

    fn try_from(wire: RangeWire) -> Result<Self> {
        Self::from_iso(&wire.from, &wire.to)
    }
}

impl From<DateRange> for RangeWire {
    fn from(range: DateRange) -> Self {
        let (from, to) = range.to_iso_pair();
        Self { from, to }
    }
}
