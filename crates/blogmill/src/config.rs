//! Configuration file loading and parsing.
//!
//! Blogmill supports repository-level configuration through `blogmill.toml`.
//! If no config file exists, the system falls back to sensible defaults.

use crate::domain;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure loaded from `blogmill.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogmillConfig {
    /// Metadata inference tuning (optional).
    pub inference: Option<InferenceConfig>,
    /// Batch processing settings (optional).
    pub batch: Option<BatchConfig>,
}

/// Metadata inference tuning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceConfig {
    /// Title used when no heading or substantive line is found.
    pub fallback_title: Option<String>,
    /// Reading speed for the read-time estimate.
    pub words_per_minute: Option<usize>,
    /// Lower clamp for the read-time estimate, in minutes.
    pub min_read_time: Option<usize>,
    /// Upper clamp for the read-time estimate, in minutes.
    pub max_read_time: Option<usize>,
    /// Maximum slug length in characters.
    pub slug_max_len: Option<usize>,
    /// Maximum excerpt length in characters, including the marker.
    pub excerpt_max_len: Option<usize>,
}

impl InferenceConfig {
    /// Get fallback title with default.
    pub fn fallback_title(&self) -> String {
        self.fallback_title
            .clone()
            .unwrap_or_else(|| "Energy Saving Guide".to_string())
    }

    /// Get words-per-minute with default.
    pub fn words_per_minute(&self) -> usize {
        self.words_per_minute.unwrap_or(domain::WORDS_PER_MINUTE)
    }

    /// Get minimum read time with default.
    pub fn min_read_time(&self) -> usize {
        self.min_read_time.unwrap_or(domain::MIN_READ_TIME)
    }

    /// Get maximum read time with default.
    pub fn max_read_time(&self) -> usize {
        self.max_read_time.unwrap_or(domain::MAX_READ_TIME)
    }

    /// Get slug length bound with default.
    pub fn slug_max_len(&self) -> usize {
        self.slug_max_len.unwrap_or(domain::SLUG_MAX_LEN)
    }

    /// Get excerpt length bound with default.
    pub fn excerpt_max_len(&self) -> usize {
        self.excerpt_max_len.unwrap_or(domain::EXCERPT_MAX_LEN)
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    /// Byline written into every post.
    pub author: Option<String>,
    /// Date assigned to the first batch position, `"YYYY-MM-DD"`; later
    /// positions advance one day each.
    pub date_origin: Option<String>,
    /// How many leading batch positions are marked featured.
    pub featured_count: Option<usize>,
}

impl BatchConfig {
    /// Get author with default.
    pub fn author(&self) -> String {
        self.author
            .clone()
            .unwrap_or_else(|| "Cost Saver Team".to_string())
    }

    /// Get the date origin with default.
    ///
    /// `load` has already rejected unparseable values, so a bad string here
    /// falls back to the default rather than panicking.
    pub fn date_origin(&self) -> NaiveDate {
        self.date_origin
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    /// Get featured count with default.
    pub fn featured_count(&self) -> usize {
        self.featured_count.unwrap_or(3)
    }
}

impl BlogmillConfig {
    /// Load configuration from the given path.
    ///
    /// A missing file yields defaults; a malformed file is an error naming
    /// the path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(origin) = config.batch.as_ref().and_then(|b| b.date_origin.as_deref()) {
            NaiveDate::parse_from_str(origin, "%Y-%m-%d").with_context(|| {
                format!(
                    "Invalid batch.date_origin {:?} in {} (expected YYYY-MM-DD)",
                    origin,
                    path.display()
                )
            })?;
        }

        Ok(config)
    }

    /// Inference section, defaulted when absent.
    pub fn inference(&self) -> InferenceConfig {
        self.inference.clone().unwrap_or_default()
    }

    /// Batch section, defaulted when absent.
    pub fn batch(&self) -> BatchConfig {
        self.batch.clone().unwrap_or_default()
    }
}
