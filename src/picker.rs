//! Two-month date range picker.
//!
//! The picker keeps an anchor month cursor and the last range it reported.
//! Every user action that changes the range returns a [`Change`] for the
//! host to apply; clicks on blank grid cells return nothing.

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{add_months, month_grid, Cell, YearMonth};
use crate::date_range::DateRange;
use crate::preset::Preset;

/// A range update for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    /// The new range value.
    pub range: DateRange,
    /// Both endpoints are set, so the host may close the picker.
    pub close: bool,
}

impl Change {
    const fn new(range: DateRange) -> Self {
        Self {
            range,
            close: range.is_complete(),
        }
    }
}

/// A grid cell annotated with selection state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// The underlying grid cell.
    pub cell: Cell,
    /// Inside the range or on one of its endpoints.
    pub selected: bool,
    /// On one of the endpoints.
    pub edge: bool,
}

/// One calendar of the two-month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// The month shown.
    pub month: YearMonth,
    /// Grid cells, leading blanks first.
    pub cells: Vec<DayCell>,
}

/// Date range picker state: the current value and the anchor month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePicker {
    value: DateRange,
    anchor: YearMonth,
}

impl RangePicker {
    /// Open a picker on `value`.
    ///
    /// The anchor month is the month of `value`'s start, or the month of
    /// `today` when nothing is selected.
    #[must_use]
    pub fn new(value: DateRange, today: NaiveDate) -> Self {
        Self {
            value,
            anchor: YearMonth::of(value.from().unwrap_or(today)),
        }
    }

    #[must_use]
    pub const fn value(&self) -> DateRange {
        self.value
    }

    /// The left-hand month of the view.
    #[must_use]
    pub const fn anchor_month(&self) -> YearMonth {
        self.anchor
    }

    /// Show one month earlier.
    pub fn previous(&mut self) {
        self.anchor = add_months(self.anchor, -1);
    }

    /// Show one month later.
    pub fn next(&mut self) {
        self.anchor = add_months(self.anchor, 1);
    }

    /// Handle a click on a grid cell. Blank cells are ignored.
    pub fn click(&mut self, cell: Cell) -> Option<Change> {
        cell.date().map(|day| self.click_day(day))
    }

    /// Handle a click on a calendar day.
    pub fn click_day(&mut self, day: NaiveDate) -> Change {
        let range = self.value.select(day);
        debug!(%day, %range, "day clicked");
        self.emit(range)
    }

    /// Apply a preset and move the view to the month it starts in.
    pub fn apply_preset(&mut self, preset: Preset, today: NaiveDate) -> Change {
        let range = preset.resolve(today);
        if let Some(from) = range.from() {
            self.anchor = YearMonth::of(from);
        }
        debug!(preset = preset.key(), %range, "preset applied");
        self.emit(range)
    }

    /// Clear the selection. Always available.
    pub fn reset(&mut self) -> Change {
        debug!("selection reset");
        self.emit(self.value.reset())
    }

    fn emit(&mut self, range: DateRange) -> Change {
        self.value = range;
        Change::new(range)
    }

    /// The anchor month and the month after it, ready to render.
    #[must_use]
    pub fn view(&self) -> [MonthView; 2] {
        [self.month_view(self.anchor), self.month_view(add_months(self.anchor, 1))]
    }

    fn month_view(&self, month: YearMonth) -> MonthView {
        let cells = month_grid(month)
            .into_iter()
            .map(|cell| {
                let (selected, edge) = cell.date().map_or((false, false), |day| {
                    let edge = self.value.is_edge(day);
                    (edge || self.value.contains(day), edge)
                });
                DayCell {
                    cell,
                    selected,
                    edge,
                }
            })
            .collect();
        MonthView { month, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_iso;

    fn date(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_anchor() {
        let today = date("2024-03-15");
        let picker = RangePicker::new(DateRange::empty(), today);
        assert_eq!(picker.anchor_month(), ym("2024-03"));

        let value = DateRange::between(date("2023-11-20"), date("2024-01-05"));
        let picker = RangePicker::new(value, today);
        assert_eq!(picker.anchor_month(), ym("2023-11"));
    }

    #[test]
    fn test_navigation() {
        let mut picker = RangePicker::new(DateRange::empty(), date("2024-01-10"));
        picker.previous();
        assert_eq!(picker.anchor_month(), ym("2023-12"));
        picker.next();
        picker.next();
        assert_eq!(picker.anchor_month(), ym("2024-02"));

        let [left, right] = picker.view();
        assert_eq!(left.month, ym("2024-02"));
        assert_eq!(right.month, ym("2024-03"));
    }

    #[test]
    fn test_navigation_stops_at_last_supported_month() {
        let last = YearMonth::latest();
        let mut picker = RangePicker::new(DateRange::empty(), last.first_day());
        picker.next();
        assert_eq!(picker.anchor_month(), last);

        let [left, right] = picker.view();
        assert_eq!(left.month, last);
        assert_eq!(right.month, last);
    }

    #[test]
    fn test_blank_click_is_noop() {
        let mut picker = RangePicker::new(DateRange::starting(date("2024-03-02")), date("2024-03-15"));
        assert_eq!(picker.click(Cell::Blank), None);
        assert_eq!(picker.value(), DateRange::starting(date("2024-03-02")));
    }

    #[test]
    fn test_click_flow_and_close_flag() {
        let mut picker = RangePicker::new(DateRange::empty(), date("2024-03-15"));

        let first = picker.click(Cell::Day(date("2024-03-12"))).unwrap();
        assert!(!first.close);
        assert_eq!(first.range, DateRange::starting(date("2024-03-12")));

        let second = picker.click_day(date("2024-03-04"));
        assert!(second.close);
        assert_eq!(second.range, DateRange::between(date("2024-03-04"), date("2024-03-12")));

        let third = picker.click_day(date("2024-03-20"));
        assert!(!third.close);
        assert_eq!(third.range, DateRange::starting(date("2024-03-20")));
    }

    #[test]
    fn test_preset_resets_anchor() {
        let mut picker = RangePicker::new(DateRange::empty(), date("2024-03-15"));
        picker.next();
        picker.next();

        let change = picker.apply_preset(Preset::PrevMonth, date("2024-03-15"));
        assert!(change.close);
        assert_eq!(picker.anchor_month(), ym("2024-02"));
        assert_eq!(picker.value(), change.range);
    }

    #[test]
    fn test_reset_always_empty() {
        let mut picker = RangePicker::new(DateRange::empty(), date("2024-03-15"));
        assert_eq!(picker.reset().range, DateRange::empty());

        picker.click_day(date("2024-03-01"));
        picker.click_day(date("2024-03-03"));
        let change = picker.reset();
        assert_eq!(change.range, DateRange::empty());
        assert!(!change.close);
    }

    #[test]
    fn test_view_marks_selection() {
        let value = DateRange::between(date("2024-03-30"), date("2024-04-02"));
        let picker = RangePicker::new(value, date("2024-03-15"));
        let [march, april] = picker.view();

        let selected: Vec<NaiveDate> = march
            .cells
            .iter()
            .chain(april.cells.iter())
            .filter(|c| c.selected)
            .filter_map(|c| c.cell.date())
            .collect();
        assert_eq!(
            selected,
            vec![date("2024-03-30"), date("2024-03-31"), date("2024-04-01"), date("2024-04-02")]
        );

        let edges = march.cells.iter().chain(april.cells.iter()).filter(|c| c.edge).count();
        assert_eq!(edges, 2);
        assert!(march.cells.iter().filter(|c| c.cell.is_blank()).all(|c| !c.selected));
    }

    #[test]
    fn test_partial_selection_marks_only_start() {
        let picker = RangePicker::new(DateRange::starting(date("2024-03-05")), date("2024-03-15"));
        let [march, _] = picker.view();
        let selected: Vec<_> = march.cells.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].edge);
    }
}
