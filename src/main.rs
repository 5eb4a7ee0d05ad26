//! Sentiment Review - Main entry point
//!
//! Combined CLI for the date range picker, the comment feed, review series
//! and label evaluation.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sentiment_review::{
    calendar::{parse_iso, YearMonth},
    comments::{CommentFeed, SentimentScore},
    config::Config,
    csv_import,
    date_range::DateRange,
    display,
    error::{Error, Result},
    evaluation,
    filter::DashboardFilter,
    picker::RangePicker,
    preset::{today_utc, Preset},
    series::{self, Granularity},
    types::{BatchId, CommentId},
};

#[derive(Parser)]
#[command(name = "sentiment-review")]
#[command(author, version, about = "Review sentiment-classified comments offline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Anchor day for presets and the calendar (YYYY-MM-DD, default: today in UTC)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Date range selection shared by several subcommands.
#[derive(clap::Args, Default)]
struct RangeArgs {
    /// Preset key (today, last7, last30, thisMonth, prevMonth)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    preset: Option<String>,

    /// Range start (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the two-month calendar with the selected range
    Calendar {
        /// Left-hand month (YYYY-MM, default: month of the range start)
        #[arg(long)]
        month: Option<String>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Resolve a preset to a concrete date range
    Preset {
        /// Preset key (today, last7, last30, thisMonth, prevMonth)
        key: Option<String>,

        /// List every preset with its resolved range
        #[arg(long)]
        list: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay day clicks on the picker and show each resulting range
    Pick {
        /// Clicked days in order (YYYY-MM-DD)
        #[arg(required = true)]
        days: Vec<String>,
    },

    /// Show the review count series and sentiment share of a classified CSV
    Series {
        /// Classified comments CSV
        csv: PathBuf,

        /// Bucket size (day, week, month)
        #[arg(short, long)]
        granularity: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse, search and relabel comments of a classified CSV
    Feed {
        /// Classified comments CSV
        csv: PathBuf,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Number of comments to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Relabel a comment, as ID=SCORE (e.g. 12=positive)
        #[arg(long = "relabel", value_name = "ID=SCORE")]
        relabels: Vec<String>,

        /// Batch id; prints the backend updates for the relabels as JSON
        #[arg(long)]
        batch: Option<String>,
    },

    /// Compute macro-F1 of classified comments against reference labels
    Evaluate {
        /// Classified comments CSV
        classified: PathBuf,

        /// Reference labels CSV (id, label)
        labels: PathBuf,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let today = match cli.today {
        Some(ref day) => parse_iso(day)?,
        None => today_utc(),
    };

    match cli.command {
        Some(Commands::Calendar { month, range }) => {
            run_calendar(&config, today, month.as_deref(), &range)
        }

        Some(Commands::Preset { key, list, json }) => run_preset(today, key.as_deref(), list, json),

        Some(Commands::Pick { days }) => run_pick(today, &days),

        Some(Commands::Series {
            csv,
            granularity,
            range,
            json,
        }) => run_series(&config, today, &csv, granularity.as_deref(), &range, json),

        Some(Commands::Feed {
            csv,
            search,
            limit,
            relabels,
            batch,
        }) => run_feed(
            &config,
            &csv,
            search.as_deref(),
            limit,
            &relabels,
            batch.as_deref(),
        ),

        Some(Commands::Evaluate { classified, labels }) => run_evaluate(&config, &classified, &labels),

        Some(Commands::Config { show, init }) => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }

        None => {
            // Default: show the calendar for the configured range
            run_calendar(&config, today, None, &RangeArgs::default())
        }
    }
}

/// Pick the date range from flags, then the configured preset, then today.
fn resolve_range(config: &Config, today: NaiveDate, args: &RangeArgs) -> Result<DateRange> {
    if let Some(ref key) = args.preset {
        return Ok(key.parse::<Preset>()?.resolve(today));
    }
    if args.from.is_some() || args.to.is_some() {
        return DateRange::from_iso(
            args.from.as_deref().unwrap_or_default(),
            args.to.as_deref().unwrap_or_default(),
        );
    }
    Ok(config.picker.default_preset.map_or_else(
        || DashboardFilter::for_today(today).date_range,
        |preset| preset.resolve(today),
    ))
}

fn run_calendar(
    config: &Config,
    today: NaiveDate,
    month: Option<&str>,
    args: &RangeArgs,
) -> Result<()> {
    let range = resolve_range(config, today, args)?;
    let mut picker = RangePicker::new(range, today);

    if let Some(month) = month {
        let target: YearMonth = month.parse()?;
        while picker.anchor_month() < target {
            picker.next();
        }
        while picker.anchor_month() > target {
            picker.previous();
        }
    }

    println!();
    for line in display::render_calendars(&picker.view()) {
        println!("  {line}");
    }
    println!("\n  Selected: {range}\n");
    Ok(())
}

fn run_preset(today: NaiveDate, key: Option<&str>, list: bool, json: bool) -> Result<()> {
    let presets: Vec<Preset> = if list {
        Preset::all().to_vec()
    } else {
        let key = key.ok_or_else(|| Error::InvalidPreset(String::new()))?;
        vec![key.parse()?]
    };

    for preset in presets {
        let range = preset.resolve(today);
        if json {
            println!("{}", serde_json::to_string(&range)?);
        } else {
            println!("{:<16} {range}", preset.label());
        }
    }
    Ok(())
}

fn run_pick(today: NaiveDate, days: &[String]) -> Result<()> {
    let mut picker = RangePicker::new(DateRange::empty(), today);
    let mut filter = DashboardFilter::for_today(today);

    for raw in days {
        let day = parse_iso(raw)?;
        let change = picker.click_day(day);
        let close = filter.apply(change);
        println!(
            "  click {day}  ->  {}{}",
            change.range,
            if close { "  (complete)" } else { "" }
        );
    }

    println!();
    for line in display::render_calendars(&picker.view()) {
        println!("  {line}");
    }
    println!();
    Ok(())
}

fn run_series(
    config: &Config,
    today: NaiveDate,
    csv: &std::path::Path,
    granularity: Option<&str>,
    args: &RangeArgs,
    json: bool,
) -> Result<()> {
    let granularity = granularity.map_or(Ok(config.series.granularity), str::parse::<Granularity>)?;
    let mut filter = DashboardFilter::for_today(today).with_granularity(granularity);
    filter.date_range = resolve_range(config, today, args)?;

    let csv = config.resolve_input(csv)?;
    let csv = csv.as_path();
    let report = csv_import::load_classified(csv)?;
    tracing::info!(
        rows = report.rows_processed,
        failed = report.rows_failed,
        "Loaded {}",
        csv.display()
    );
    let feed = CommentFeed::new(report.records);
    let selected = feed.in_range(&filter.date_range);

    let mut points = series::review_series(selected.iter().copied(), filter.granularity);
    if config.series.fill_gaps {
        points = series::fill_gaps(&points, &filter.date_range, filter.granularity);
    }
    let share = series::sentiment_share(selected.iter().copied());

    if json {
        let payload = serde_json::json!({
            "filter": filter,
            "series": points,
            "share": share,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    display::print_section(&format!(
        "REVIEWS BY {} - {}",
        filter.granularity.name().to_uppercase(),
        filter.date_range
    ));
    if points.is_empty() {
        println!("  No reviews found for this period.");
    } else {
        display::display_series(&points);
    }

    display::print_section_simple("SENTIMENT SHARE");
    display::display_share(&share);
    println!();
    Ok(())
}

fn parse_relabel(raw: &str) -> Result<(CommentId, SentimentScore)> {
    let (id, score) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidScore(raw.to_string()))?;
    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidScore(raw.to_string()))?;
    Ok((CommentId(id), score.parse()?))
}

fn run_feed(
    config: &Config,
    csv: &std::path::Path,
    search: Option<&str>,
    limit: Option<usize>,
    relabels: &[String],
    batch: Option<&str>,
) -> Result<()> {
    let batch = batch.map(str::parse::<BatchId>).transpose()?;
    let report = csv_import::load_classified(&config.resolve_input(csv)?)?;
    for error in &report.errors {
        tracing::warn!("{error}");
    }

    let mut feed = CommentFeed::new(report.records);
    for raw in relabels {
        let (id, score) = parse_relabel(raw)?;
        feed.relabel(id, score)?;
    }

    let limit = limit.unwrap_or(config.feed.limit);
    let hits = feed.search(search.unwrap_or_default());
    let shown: Vec<_> = hits.iter().copied().take(limit).collect();

    display::print_section_simple(&format!(
        "COMMENTS ({} of {})",
        shown.len(),
        feed.len()
    ));
    display::display_feed(&feed, &shown);

    if feed.has_pending() {
        display::print_section_simple("PENDING RELABELS");
        for (id, score) in feed.pending() {
            println!("  #{:<8} -> {score}", id.0);
        }
    }

    if let Some(batch) = batch {
        let updates = feed.commit(batch);
        println!("\n{}", serde_json::to_string_pretty(&updates)?);
    }
    Ok(())
}

fn run_evaluate(
    config: &Config,
    classified: &std::path::Path,
    labels: &std::path::Path,
) -> Result<()> {
    let report = csv_import::load_classified(&config.resolve_input(classified)?)?;
    let predictions = evaluation::predictions_of(&report.records);
    let labels = csv_import::load_labels(&config.resolve_input(labels)?)?;

    let result = evaluation::evaluate(&labels, &predictions)?;
    println!("F1 (macro): {:.3}", result.f1_macro);
    println!("  matched:   {}", result.matched);
    println!("  unmatched: {}", result.unmatched);
    Ok(())
}
