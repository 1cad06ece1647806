//! Upstream source files, pre-fetched by the collectors into one folder
//!
//! Each source is optional. A missing or malformed file skips that source,
//! and a malformed element inside a list skips only that element.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{DataError, DataResult};

pub const FUNDAMENTALS_FILE: &str = "fundamentals_data.json";
pub const MARKET_ANALYSIS_FILE: &str = "market_analysis.json";
pub const PRICE_BARS_FILE: &str = "xauusd_30d.json";
pub const ECONOMIC_CALENDAR_FILE: &str = "economic_calendar.json";
pub const NEWS_FILE: &str = "news_30days.json";
pub const SOCIAL_FILE: &str = "reddit_news.json";

/// One technical-analysis tick from the market analysis feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAnalysisTick {
    pub timestamp: Option<String>,
    pub instrument: Option<String>,
    pub current_price: Value,
    pub final_bias: Value,
    pub indicators: Option<TickIndicators>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickIndicators {
    pub rsi_value: Value,
    pub macd_value: Value,
}

/// Daily XAU/USD bar. Prices stay raw JSON; the renderer parses them leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBar {
    #[serde(skip_serializing)]
    pub time: Option<String>,
    pub open: Value,
    pub high: Value,
    pub low: Value,
    pub close: Value,
}

/// Economic calendar release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    #[serde(skip_serializing)]
    pub date: Option<String>,
    pub time: Value,
    pub currency: Value,
    pub event: Value,
    pub actual: Value,
    pub forecast: Value,
    pub previous: Value,
}

/// Headline as stored by the news collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsHeadline {
    #[serde(skip_serializing)]
    pub time: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub ticker: Option<String>,
}

/// Social post as stored by the social collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPostRecord {
    #[serde(skip_serializing)]
    pub time: Option<String>,
    pub title: Option<String>,
    pub source: Option<String>,
}

/// Everything found in the input folder for one run
#[derive(Debug, Clone, Default)]
pub struct SourceBundle {
    pub fundamentals: Option<Map<String, Value>>,
    pub market_analysis: Vec<MarketAnalysisTick>,
    pub price_bars: Vec<PriceBar>,
    pub calendar_events: Vec<CalendarEvent>,
    pub headlines: Vec<NewsHeadline>,
    pub social_posts: Vec<SocialPostRecord>,
    /// Names of sources that were absent or unreadable
    pub skipped: Vec<String>,
}

impl SourceBundle {
    /// Load every known source from `dir`, skipping the ones that are unavailable
    pub fn load(dir: &Path) -> Self {
        let mut bundle = SourceBundle::default();

        if let Some(value) = bundle.scan(dir, FUNDAMENTALS_FILE) {
            match value {
                Value::Object(map) => bundle.fundamentals = Some(map),
                _ => bundle.skip(FUNDAMENTALS_FILE, "expected an object"),
            }
        }

        if let Some(value) = bundle.scan(dir, MARKET_ANALYSIS_FILE) {
            bundle.market_analysis = decode_list(MARKET_ANALYSIS_FILE, value.as_array());
        }

        if let Some(value) = bundle.scan(dir, PRICE_BARS_FILE) {
            bundle.price_bars = decode_list(PRICE_BARS_FILE, value.as_array());
        }

        if let Some(value) = bundle.scan(dir, ECONOMIC_CALENDAR_FILE) {
            bundle.calendar_events =
                decode_list(ECONOMIC_CALENDAR_FILE, value.get("events").and_then(Value::as_array));
        }

        if let Some(value) = bundle.scan(dir, NEWS_FILE) {
            bundle.headlines =
                decode_list(NEWS_FILE, value.get("headlines").and_then(Value::as_array));
        }

        if let Some(value) = bundle.scan(dir, SOCIAL_FILE) {
            bundle.social_posts =
                decode_list(SOCIAL_FILE, value.get("posts").and_then(Value::as_array));
        }

        bundle
    }

    fn scan(&mut self, dir: &Path, name: &str) -> Option<Value> {
        match read_json(&dir.join(name), name) {
            Ok(value) => {
                info!(source = name, "Scanning source");
                Some(value)
            }
            Err(e) => {
                self.skip(name, &e.to_string());
                None
            }
        }
    }

    fn skip(&mut self, name: &str, reason: &str) {
        warn!(source = name, reason, "Skipping source");
        self.skipped.push(name.to_string());
    }
}

/// Read a JSON file, reporting absence as [`DataError::SourceMissing`]
pub fn read_json(path: &Path, source_name: &str) -> DataResult<Value> {
    if !path.exists() {
        return Err(DataError::source_missing(source_name, path));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Decode list elements one by one, dropping the ones that don't fit `T`
pub fn decode_list<T: DeserializeOwned>(source_name: &str, items: Option<&Vec<Value>>) -> Vec<T> {
    let Some(items) = items else {
        warn!(source = source_name, "Source has no list payload");
        return Vec::new();
    };

    let decoded: Vec<T> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    let dropped = items.len() - decoded.len();
    if dropped > 0 {
        debug!(source = source_name, dropped, "Dropped malformed records");
    }
    decoded
}
