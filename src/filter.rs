//! Dashboard filter: the host side of the date range picker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::picker::Change;
use crate::series::Granularity;

/// Granularity and date range driving the dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub granularity: Granularity,
    pub date_range: DateRange,
}

impl DashboardFilter {
    /// Daily granularity over `today` only, the dashboard's opening state.
    #[must_use]
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            granularity: Granularity::Day,
            date_range: DateRange::between(today, today),
        }
    }

    #[must_use]
    pub const fn with_granularity(self, granularity: Granularity) -> Self {
        Self {
            granularity,
            date_range: self.date_range,
        }
    }

    /// Take a picker change. Returns true when the picker should close.
    pub fn apply(&mut self, change: Change) -> bool {
        self.date_range = change.range;
        change.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;
    use crate::picker::RangePicker;

    #[test]
    fn test_for_today() {
        let today = parse_iso("2024-03-15").unwrap();
        let filter = DashboardFilter::for_today(today);
        assert_eq!(filter.granularity, Granularity::Day);
        assert_eq!(filter.date_range, DateRange::between(today, today));
    }

    #[test]
    fn test_apply_picker_changes() {
        let today = parse_iso("2024-03-15").unwrap();
        let mut filter = DashboardFilter::for_today(today);
        let mut picker = RangePicker::new(filter.date_range, today);

        let close = filter.apply(picker.click_day(parse_iso("2024-03-01").unwrap()));
        assert!(!close);
        assert!(!filter.date_range.is_complete());

        let close = filter.apply(picker.click_day(parse_iso("2024-03-07").unwrap()));
        assert!(close);
        assert_eq!(filter.date_range.to_string(), "2024-03-01 → 2024-03-07");
    }

    #[test]
    fn test_json_shape() {
        let today = parse_iso("2024-03-15").unwrap();
        let filter = DashboardFilter::for_today(today).with_granularity(Granularity::Week);
        let json = serde_json::to_value(filter).unwrap();
        assert_eq!(json["granularity"], "week");
        assert_eq!(json["dateRange"]["from"], "2024-03-15");
    }
}
