//! Review Stats CLI
//!
//! Standalone binary printing a one-shot summary of a classified CSV.

use std::path::PathBuf;

use chrono::Datelike;
use clap::Parser;
use sentiment_review::{
    calendar::{parse_iso, WEEKDAY_LABELS},
    comments::CommentFeed,
    config::Config,
    csv_import::{load_classified, load_labels},
    display::{display_series, display_share, make_bar, print_section},
    error::Result,
    evaluation::{evaluate, predictions_of},
    preset::{today_utc, Preset},
    series::{review_series, sentiment_share},
};

#[derive(Parser)]
#[command(name = "review-stats")]
#[command(author, version, about = "Summarize a classified comments CSV")]
struct Args {
    /// Classified comments CSV
    csv: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Restrict to a preset range (today, last7, last30, thisMonth, prevMonth)
    #[arg(long)]
    preset: Option<String>,

    /// Anchor day for the preset (YYYY-MM-DD, default: today in UTC)
    #[arg(long)]
    today: Option<String>,

    /// Reference labels CSV to compute macro-F1 against
    #[arg(long)]
    labels: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };

    let today = match args.today {
        Some(ref day) => parse_iso(day)?,
        None => today_utc(),
    };
    let range = match args.preset {
        Some(ref key) => key.parse::<Preset>()?.resolve(today),
        None => config
            .picker
            .default_preset
            .map(|p| p.resolve(today))
            .unwrap_or_default(),
    };

    let report = load_classified(&config.resolve_input(&args.csv)?)?;
    let feed = CommentFeed::new(report.records);
    let selected = feed.in_range(&range);

    // Display header
    println!("\n{}", "*".repeat(50));
    println!("     REVIEW SUMMARY - {range}");
    println!("{}", "*".repeat(50));

    if selected.is_empty() {
        println!("\nNo comments found for this period.");
        return Ok(());
    }

    print_section("OVERVIEW");
    let dated = selected.iter().filter(|c| c.created_at.is_some()).count();
    println!("  Comments:         {:>10}", selected.len());
    println!("  With timestamp:   {:>10}", dated);
    println!("  Rows skipped:     {:>10}", report.rows_failed);

    print_section("SENTIMENT SHARE");
    display_share(&sentiment_share(selected.iter().copied()));

    let granularity = config.series.granularity;
    print_section(&format!("REVIEWS BY {}", granularity.name().to_uppercase()));
    display_series(&review_series(selected.iter().copied(), granularity));

    print_section("REVIEWS BY WEEKDAY");
    let mut weekdays = [0_u64; 7];
    for day in selected.iter().filter_map(|c| c.created_day()) {
        weekdays[day.weekday().num_days_from_monday() as usize] += 1;
    }
    let max = weekdays.iter().copied().max().unwrap_or(0);
    for (label, count) in WEEKDAY_LABELS.iter().zip(weekdays) {
        println!("  {label}  {} {count:>5}", make_bar(count, max, 25));
    }

    if let Some(ref path) = args.labels {
        print_section("EVALUATION");
        let labels = load_labels(&config.resolve_input(path)?)?;
        let result = evaluate(&labels, &predictions_of(feed.comments()))?;
        println!("  F1 (macro):       {:>10.3}", result.f1_macro);
        println!("  Matched labels:   {:>10}", result.matched);
    }

    println!("\n{}\n", "*".repeat(50));

    Ok(())
}
