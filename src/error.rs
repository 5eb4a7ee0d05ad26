//! Error types for sentiment-review

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("Invalid preset '{0}'")]
    InvalidPreset(String),

    #[error("Invalid granularity '{0}', expected day, week or month")]
    InvalidGranularity(String),

    #[error("Invalid sentiment score '{0}'")]
    InvalidScore(String),

    #[error("Unknown comment id {0}")]
    UnknownComment(u64),

    #[error("Invalid batch id '{0}'")]
    InvalidBatchId(String),

    #[error("No overlapping ids between labels and classified comments")]
    NoOverlap,

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid CSV error
    pub fn invalid_csv(msg: impl Into<String>) -> Self {
        Self::InvalidCsv(msg.into())
    }
}
