//! Configuration management for sentiment-review

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::preset::Preset;
use crate::series::Granularity;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Date range picker settings
    pub picker: PickerConfig,

    /// Comment feed settings
    pub feed: FeedConfig,

    /// Review series settings
    pub series: SeriesConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Directory searched for relative CSV paths missing from the working
    /// directory (default: ~/.local/share/sentiment-review)
    pub data_dir: Option<PathBuf>,
}

/// Date range picker settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Preset applied when no explicit range is given (unset = today only)
    pub default_preset: Option<Preset>,
}

/// Comment feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Number of comments shown in the feed
    pub limit: usize,
}

/// Review series settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Bucket size for the review series
    pub granularity: Granularity,

    /// Emit zero-valued buckets across the selected range
    pub fill_gaps: bool,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join("sentiment-review").join("config.toml"))
    }

    /// Get the data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.general.data_dir {
            Ok(dir.clone())
        } else {
            let data_dir = dirs::data_local_dir()
                .ok_or_else(|| Error::config("Could not determine data directory"))?;
            Ok(data_dir.join("sentiment-review"))
        }
    }

    /// Locate an input file.
    ///
    /// Paths that exist as given are used unchanged. A relative path that
    /// does not exist is looked up in the data directory; if it is missing
    /// there too, the original path is returned so the open error names it.
    pub fn resolve_input(&self, path: &std::path::Path) -> Result<PathBuf> {
        if path.exists() || path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let candidate = self.data_dir()?.join(path);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "resolved input from data directory");
            Ok(candidate)
        } else {
            Ok(path.to_path_buf())
        }
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.feed.limit == 0 {
            return Err(Error::config("feed.limit must be positive"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        Ok(())
    }
}
