//! Review time series and sentiment share.
//!
//! Powers the two dashboard charts: review counts per day, week or month,
//! and the share of each sentiment class.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{add_months, YearMonth};
use crate::comments::{Comment, SentimentScore};
use crate::date_range::DateRange;
use crate::error::{Error, Result};
use crate::types::ReviewCount;

/// Bucket size for the review series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parse a granularity, falling back to [`Granularity::Day`] for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_or_day(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// First day of the bucket containing `date`.
    ///
    /// Weeks start on Monday; months on the 1st.
    #[must_use]
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Month => YearMonth::of(date).first_day(),
        }
    }

    /// First day of the bucket following the one starting at `start`, or
    /// `None` past the end of the calendar.
    #[must_use]
    pub fn next_bucket(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.succ_opt(),
            Self::Week => start.checked_add_signed(Duration::days(7)),
            Self::Month => {
                let month = YearMonth::of(start);
                let next = add_months(month, 1);
                (next != month).then(|| next.first_day())
            }
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(Error::InvalidGranularity(s.to_string())),
        }
    }
}

/// One point of the review series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// First day of the bucket
    pub date: NaiveDate,
    pub value: ReviewCount,
}

/// Count comments per bucket, ascending by bucket start.
///
/// Comments without a timestamp are skipped. Empty buckets are not emitted;
/// use [`fill_gaps`] for a continuous axis.
pub fn review_series<'a, I>(comments: I, granularity: Granularity) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Comment>,
{
    let mut buckets: BTreeMap<NaiveDate, ReviewCount> = BTreeMap::new();
    for day in comments.into_iter().filter_map(Comment::created_day) {
        buckets
            .entry(granularity.bucket_start(day))
            .or_default()
            .increment();
    }
    buckets
        .into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect()
}

/// Extend a series with zero-valued buckets across a complete range.
///
/// Points outside the range are kept. Partial or empty ranges return the
/// series unchanged.
#[must_use]
pub fn fill_gaps(
    series: &[SeriesPoint],
    range: &DateRange,
    granularity: Granularity,
) -> Vec<SeriesPoint> {
    let (Some(from), Some(to)) = (range.from(), range.to()) else {
        return series.to_vec();
    };

    let mut buckets: BTreeMap<NaiveDate, ReviewCount> =
        series.iter().map(|p| (p.date, p.value)).collect();

    let last = granularity.bucket_start(to);
    let mut cursor = granularity.bucket_start(from);
    while cursor <= last {
        buckets.entry(cursor).or_default();
        match granularity.next_bucket(cursor) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    buckets
        .into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect()
}

/// Fraction of comments in each sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentShare {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentShare {
    #[must_use]
    pub const fn get(&self, score: SentimentScore) -> f64 {
        match score {
            SentimentScore::Negative => self.negative,
            SentimentScore::Neutral => self.neutral,
            SentimentScore::Positive => self.positive,
        }
    }
}

/// Share of each sentiment class. All zeros for no comments.
pub fn sentiment_share<'a, I>(comments: I) -> SentimentShare
where
    I: IntoIterator<Item = &'a Comment>,
{
    let mut counts = [0_u64; 3];
    for comment in comments {
        counts[usize::from(comment.score.code())] += 1;
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return SentimentShare::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = |n: u64| n as f64 / total as f64;
    SentimentShare {
        negative: ratio(counts[0]),
        neutral: ratio(counts[1]),
        positive: ratio(counts[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;
    use crate::types::CommentId;
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    fn comment(id: u64, day: Option<&str>, score: SentimentScore) -> Comment {
        Comment {
            id: CommentId(id),
            text: format!("comment {id}"),
            score,
            created_at: day.map(|d| {
                let d = date(d);
                Utc.with_ymd_and_hms(d.year(), d.month(), d.day(), 8, 30, 0).unwrap()
            }),
        }
    }

    fn sample() -> Vec<Comment> {
        vec![
            comment(1, Some("2024-03-04"), SentimentScore::Positive),
            comment(2, Some("2024-03-04"), SentimentScore::Negative),
            comment(3, Some("2024-03-06"), SentimentScore::Neutral),
            comment(4, Some("2024-03-11"), SentimentScore::Positive),
            comment(5, Some("2024-04-01"), SentimentScore::Positive),
            comment(6, None, SentimentScore::Negative),
        ]
    }

    fn values(series: &[SeriesPoint]) -> Vec<(String, u64)> {
        series
            .iter()
            .map(|p| (p.date.to_string(), p.value.get()))
            .collect()
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert!("quarter".parse::<Granularity>().is_err());
        assert_eq!(Granularity::parse_or_day("quarter"), Granularity::Day);
        assert_eq!(Granularity::parse_or_day("month"), Granularity::Month);
    }

    #[test]
    fn test_bucket_start() {
        // 2024-03-06 is a Wednesday
        assert_eq!(Granularity::Week.bucket_start(date("2024-03-06")), date("2024-03-04"));
        assert_eq!(Granularity::Week.bucket_start(date("2024-03-04")), date("2024-03-04"));
        assert_eq!(Granularity::Week.bucket_start(date("2024-03-03")), date("2024-02-26"));
        assert_eq!(Granularity::Month.bucket_start(date("2024-03-31")), date("2024-03-01"));
        assert_eq!(Granularity::Day.bucket_start(date("2024-03-31")), date("2024-03-31"));
    }

    #[test]
    fn test_daily_series() {
        let series = review_series(&sample(), Granularity::Day);
        assert_eq!(
            values(&series),
            vec![
                ("2024-03-04".to_string(), 2),
                ("2024-03-06".to_string(), 1),
                ("2024-03-11".to_string(), 1),
                ("2024-04-01".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_weekly_and_monthly_series() {
        let weekly = review_series(&sample(), Granularity::Week);
        assert_eq!(
            values(&weekly),
            vec![
                ("2024-03-04".to_string(), 3),
                ("2024-03-11".to_string(), 1),
                ("2024-04-01".to_string(), 1),
            ]
        );

        let monthly = review_series(&sample(), Granularity::Month);
        assert_eq!(
            values(&monthly),
            vec![("2024-03-01".to_string(), 4), ("2024-04-01".to_string(), 1)]
        );
    }

    #[test]
    fn test_fill_gaps() {
        let series = review_series(&sample(), Granularity::Week);
        let range = DateRange::between(date("2024-03-01"), date("2024-03-31"));
        let filled = fill_gaps(&series, &range, Granularity::Week);
        assert_eq!(
            values(&filled),
            vec![
                ("2024-02-26".to_string(), 0),
                ("2024-03-04".to_string(), 3),
                ("2024-03-11".to_string(), 1),
                ("2024-03-18".to_string(), 0),
                ("2024-03-25".to_string(), 0),
                ("2024-04-01".to_string(), 1),
            ]
        );

        let partial = DateRange::starting(date("2024-03-01"));
        assert_eq!(fill_gaps(&series, &partial, Granularity::Week), series);
    }

    #[test]
    fn test_fill_gaps_monthly_across_year() {
        let range = DateRange::between(date("2023-11-15"), date("2024-02-10"));
        let filled = fill_gaps(&[], &range, Granularity::Month);
        let dates: Vec<String> = filled.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-11-01", "2023-12-01", "2024-01-01", "2024-02-01"]);
    }

    #[test]
    fn test_fill_gaps_stops_at_end_of_calendar() {
        let last = YearMonth::latest();
        let range = DateRange::between(last.first_day(), last.last_day());

        let monthly = fill_gaps(&[], &range, Granularity::Month);
        assert_eq!(monthly.len(), 1);
        assert_eq!(Granularity::Month.next_bucket(last.first_day()), None);

        let daily = fill_gaps(&[], &range, Granularity::Day);
        assert_eq!(daily.len(), 31);
        assert_eq!(Granularity::Day.next_bucket(NaiveDate::MAX), None);
    }

    #[test]
    fn test_sentiment_share() {
        let share = sentiment_share(&sample());
        assert!((share.positive - 0.5).abs() < 1e-9);
        assert!((share.negative - 2.0 / 6.0).abs() < 1e-9);
        assert!((share.neutral - 1.0 / 6.0).abs() < 1e-9);
        assert!((share.get(SentimentScore::Positive) - share.positive).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sentiment_share_empty() {
        let share = sentiment_share(&[]);
        assert_eq!(share, SentimentShare::default());
    }
}
