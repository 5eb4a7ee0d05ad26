//! Display utilities for terminal output.
//!
//! This module provides the formatting shared by the CLI tools: the
//! two-month calendar, review series bars and comment feed rows.
//!
//! # Functions
//!
//! - [`render_month`] / [`render_calendars`] - Calendar grids with selection marks
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_series`] / [`display_share`] / [`display_feed`] - Display formatted stats

use chrono::Datelike;

use crate::calendar::{Cell, WEEKDAY_LABELS};
use crate::comments::{Comment, CommentFeed, SentimentScore};
use crate::picker::{DayCell, MonthView};
use crate::series::{SentimentShare, SeriesPoint};

const CELL_WIDTH: usize = 4;
const MONTH_WIDTH: usize = CELL_WIDTH * 7;
const WEEK_ROWS: usize = 6;

/// Format a single grid cell.
///
/// Endpoints are bracketed, days strictly inside the range are dotted, and
/// blank cells are padding.
#[must_use]
pub fn format_cell(cell: &DayCell) -> String {
    match cell.cell {
        Cell::Blank => " ".repeat(CELL_WIDTH),
        Cell::Day(date) if cell.edge => format!("[{:>2}]", date.day()),
        Cell::Day(date) if cell.selected => format!("·{:>2}·", date.day()),
        Cell::Day(date) => format!(" {:>2} ", date.day()),
    }
}

/// Render one month as fixed-width lines: title, weekday header, six weeks.
#[must_use]
pub fn render_month(view: &MonthView) -> Vec<String> {
    let mut lines = Vec::with_capacity(WEEK_ROWS + 2);
    lines.push(format!("{:^width$}", view.month.title(), width = MONTH_WIDTH));
    lines.push(
        WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{label:^CELL_WIDTH$}"))
            .collect(),
    );

    let mut weeks: Vec<String> = view
        .cells
        .chunks(7)
        .map(|week| {
            let row: String = week.iter().map(format_cell).collect();
            format!("{row:<MONTH_WIDTH$}")
        })
        .collect();
    weeks.resize(WEEK_ROWS, " ".repeat(MONTH_WIDTH));
    lines.extend(weeks);
    lines
}

/// Render the two months of the picker side by side.
#[must_use]
pub fn render_calendars(views: &[MonthView; 2]) -> Vec<String> {
    let left = render_month(&views[0]);
    let right = render_month(&views[1]);
    left.iter()
        .zip(right.iter())
        .map(|(l, r)| format!("{l}   {r}").trim_end().to_string())
        .collect()
}

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Counts characters rather than bytes so non-ASCII comments are safe.
/// For `max_len < 3`, truncates without ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use sentiment_review::display::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("hello", 2), "he");
/// ```
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Create a visual bar for displaying relative values.
///
/// Uses Unicode block characters to create a proportional bar chart.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn make_bar(value: u64, max_value: u64, width: usize) -> String {
    if max_value == 0 || value == 0 {
        return " ".repeat(width);
    }
    let ratio = (value as f64 / max_value as f64).clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("  {title}");
    println!("{}", "=".repeat(50));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(30));
}

/// Display the review series as one bar per bucket.
pub fn display_series(series: &[SeriesPoint]) {
    let max = series.iter().map(|p| p.value.get()).max().unwrap_or(0);
    for point in series {
        let bar = make_bar(point.value.get(), max, 30);
        println!("  {}  {bar} {:>5}", point.date, point.value);
    }
}

/// Display the share of each sentiment class.
pub fn display_share(share: &SentimentShare) {
    for score in SentimentScore::all() {
        let pct = share.get(*score) * 100.0;
        println!("  {:<10} {:>5.1}%", score.name(), pct);
    }
}

/// Format one feed row: id, effective score (marked `*` when pending), text.
#[must_use]
pub fn format_comment(comment: &Comment, score: SentimentScore, pending: bool) -> String {
    let marker = if pending { "*" } else { " " };
    format!(
        "  {:>6} {:<9}{marker} {}",
        comment.id,
        score.name(),
        truncate(&comment.text, 60)
    )
}

/// Display feed rows with their effective scores.
pub fn display_feed(feed: &CommentFeed, comments: &[&Comment]) {
    for comment in comments {
        let score = feed.effective_score(comment.id).unwrap_or(comment.score);
        println!("{}", format_comment(comment, score, score != comment.score));
    }
}
