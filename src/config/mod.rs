use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::sentiment::QualityThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathConfig,
    pub cache: CacheConfig,
    pub retention_days: i64,
    pub noise: NoiseConfig,

    // Run-date overrides (set from CLI flags, not from env vars)
    #[serde(skip)]
    pub as_of_date: Option<NaiveDate>,
    #[serde(skip)]
    pub as_of_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Collector JSON outputs (fundamentals, prices, calendar, news, social)
    pub input_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub summary_dir: PathBuf,
    /// News and social layer outputs
    pub layer_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub reddit_min_score: i64,
    pub stocktwits_min_likes: i64,
    pub min_post_length: usize,
    pub max_post_length: usize,
}

impl NoiseConfig {
    pub fn thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            reddit_min_score: self.reddit_min_score,
            stocktwits_min_likes: self.stocktwits_min_likes,
            min_post_length: self.min_post_length,
            max_post_length: self.max_post_length,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// "Now" for this run: the explicit override, midnight of the overridden
    /// date, or the local wall clock.
    pub fn get_effective_datetime(&self) -> NaiveDateTime {
        if let Some(time) = self.as_of_time {
            return time;
        }
        match self.as_of_date {
            Some(date) => date.and_time(chrono::NaiveTime::MIN),
            None => chrono::Local::now().naive_local(),
        }
    }

    /// "Today" for retention and headline-date resolution
    pub fn get_effective_date(&self) -> NaiveDate {
        self.as_of_date
            .or_else(|| self.as_of_time.map(|t| t.date()))
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn load() -> Result<Self> {
        // Load .env file - this sets env vars that aren't already set
        dotenv::dotenv().ok();

        let config = Config {
            paths: PathConfig {
                input_dir: env_or("GOLDPULSE_INPUT_DIR", "Fetchers/jsons").into(),
                snapshot_dir: env_or("GOLDPULSE_SNAPSHOT_DIR", "TEXT/daily_snapshots").into(),
                summary_dir: env_or("GOLDPULSE_SUMMARY_DIR", "TEXT/daily_summaries").into(),
                layer_dir: env_or("GOLDPULSE_LAYER_DIR", "data").into(),
            },
            cache: CacheConfig {
                url: env_or("SOCIAL_CACHE_URL", "sqlite://data/social_cache.db"),
            },
            retention_days: env_or("RETENTION_DAYS", "30")
                .parse()
                .context("Invalid RETENTION_DAYS value")?,
            noise: NoiseConfig {
                reddit_min_score: env_or("REDDIT_MIN_SCORE", "5")
                    .parse()
                    .context("Invalid REDDIT_MIN_SCORE value")?,
                stocktwits_min_likes: env_or("STOCKTWITS_MIN_LIKES", "1")
                    .parse()
                    .context("Invalid STOCKTWITS_MIN_LIKES value")?,
                min_post_length: env_or("MIN_POST_LENGTH", "15")
                    .parse()
                    .context("Invalid MIN_POST_LENGTH value")?,
                max_post_length: env_or("MAX_POST_LENGTH", "2000")
                    .parse()
                    .context("Invalid MAX_POST_LENGTH value")?,
            },
            as_of_date: None,
            as_of_time: None,
        };

        if config.retention_days < 0 {
            anyhow::bail!("RETENTION_DAYS must not be negative (got {})", config.retention_days);
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = QualityThresholds::default();
        Self {
            paths: PathConfig {
                input_dir: PathBuf::from("Fetchers/jsons"),
                snapshot_dir: PathBuf::from("TEXT/daily_snapshots"),
                summary_dir: PathBuf::from("TEXT/daily_summaries"),
                layer_dir: PathBuf::from("data"),
            },
            cache: CacheConfig {
                url: "sqlite://data/social_cache.db".to_string(),
            },
            retention_days: 30,
            noise: NoiseConfig {
                reddit_min_score: thresholds.reddit_min_score,
                stocktwits_min_likes: thresholds.stocktwits_min_likes,
                min_post_length: thresholds.min_post_length,
                max_post_length: thresholds.max_post_length,
            },
            as_of_date: None,
            as_of_time: None,
        }
    }
}
