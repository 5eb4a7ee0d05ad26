//! # Sentiment Review
//!
//! Offline review of sentiment-classified comments.
//!
//! This crate provides:
//! - Calendar arithmetic and a two-month date range picker
//! - Date range presets resolved against an explicit anchor day
//! - A comment feed with search and pending relabels
//! - Review count series by day, week or month, and sentiment share
//! - Macro-F1 evaluation of classified comments against reference labels
//! - CSV import of classified exports and label files

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod calendar;
pub mod comments;
pub mod config;
pub mod csv_import;
pub mod date_range;
pub mod display;
pub mod error;
pub mod evaluation;
pub mod filter;
pub mod picker;
pub mod preset;
pub mod series;
pub mod types;

pub use config::Config;
pub use date_range::DateRange;
pub use error::{Error, Result};
pub use picker::RangePicker;
pub use preset::Preset;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "sentiment-review";
