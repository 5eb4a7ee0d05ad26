//! Calendar arithmetic for the date range picker.
//!
//! All values here are calendar days ([`NaiveDate`]) with no time-of-day or
//! timezone attached. Callers that start from a timestamp normalize it to UTC
//! first (see [`crate::preset::today_utc`]).
//!
//! # Functions
//!
//! - [`month_grid`] - Monday-first display grid for a month
//! - [`add_months`] - Shift a month cursor by any number of months
//! - [`days_in_month`] - Length of a month, leap years included
//! - [`same_day`] / [`in_range`] - Selection predicates
//! - [`to_iso`] / [`parse_iso`] - `YYYY-MM-DD` formatting and parsing

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// Short weekday labels in grid column order (Monday first).
pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

const ISO_FORMAT: &str = "%Y-%m-%d";

/// A month cursor: a year and a month number in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Earliest supported month.
    #[must_use]
    pub fn earliest() -> Self {
        Self::of(NaiveDate::MIN)
    }

    /// Latest supported month.
    #[must_use]
    pub fn latest() -> Self {
        Self::of(NaiveDate::MAX)
    }

    /// Create a month cursor.
    ///
    /// Rejects month numbers outside `1..=12` and years outside the
    /// supported calendar ([`YearMonth::earliest`] to [`YearMonth::latest`]).
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Ok(Self { year, month })
        } else {
            Err(Error::InvalidMonth(format!("{year:04}-{month:02}")))
        }
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First calendar day of this month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("day 1 is always valid")
    }

    /// Last calendar day of this month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, days_in_month(self))
            .expect("days_in_month is always a valid day")
    }

    /// Human-readable title, e.g. "March 2024".
    #[must_use]
    pub fn title(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

/// A single cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Leading padding before day 1. Not clickable.
    Blank,
    /// A calendar day of the month.
    Day(NaiveDate),
}

impl Cell {
    /// The calendar day behind this cell, if any.
    #[must_use]
    pub const fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Blank => None,
            Self::Day(date) => Some(date),
        }
    }

    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Format a calendar day as `YYYY-MM-DD`.
#[must_use]
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Number of days in the given month.
#[must_use]
pub const fn days_in_month(month: YearMonth) -> u32 {
    match month.month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(month.year) => 29,
        2 => 28,
        _ => 31,
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Shift a month cursor by `delta` months (negative moves backwards).
///
/// Saturates at [`YearMonth::earliest`] and [`YearMonth::latest`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn add_months(month: YearMonth, delta: i32) -> YearMonth {
    let index = |m: YearMonth| i64::from(m.year) * 12 + i64::from(m.month) - 1;
    let total = (index(month) + i64::from(delta))
        .clamp(index(YearMonth::earliest()), index(YearMonth::latest()));
    YearMonth {
        year: total.div_euclid(12) as i32,
        month: total.rem_euclid(12) as u32 + 1,
    }
}

/// Number of blank cells before day 1 in a Monday-first grid, in `0..=6`.
#[must_use]
pub fn leading_blanks(month: YearMonth) -> usize {
    month.first_day().weekday().num_days_from_monday() as usize
}

/// Build the display grid for a month.
///
/// Emits one [`Cell::Blank`] per weekday offset before the 1st, then one
/// [`Cell::Day`] per day of the month. There is no trailing padding, so the
/// grid always holds `leading_blanks + days_in_month` cells.
#[must_use]
pub fn month_grid(month: YearMonth) -> Vec<Cell> {
    let offset = leading_blanks(month);
    let first = month.first_day();
    let mut grid = Vec::with_capacity(offset + days_in_month(month) as usize);
    grid.extend(std::iter::repeat(Cell::Blank).take(offset));
    grid.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == month.month)
            .map(Cell::Day),
    );
    grid
}

/// True when both sides are set and fall on the same calendar day.
#[must_use]
pub fn same_day(a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// True when both endpoints are set and `date` lies between them, inclusive.
#[must_use]
pub fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => from <= date && date <= to,
        _ => false,
    }
}
