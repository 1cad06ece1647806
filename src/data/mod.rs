//! Data layer: source records, date normalization and the item models shared by
//! the snapshot pipeline and the news/social timeframe layers

pub mod dates;
pub mod errors;
pub mod sources;

// Re-export commonly used types
pub use dates::{normalize_date, parse_calendar_date, parse_timestamp, HeadlineClock};
pub use errors::{DataError, DataResult};
pub use sources::{
    CalendarEvent, MarketAnalysisTick, NewsHeadline, PriceBar, SocialPostRecord, SourceBundle,
};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named-entity annotations keyed by label (ORG, PERSON, GPE...)
pub type EntityMap = BTreeMap<String, Vec<String>>;

/// Headline as delivered by the news collector, before time resolution.
///
/// `time` is an ISO timestamp when the collector already resolved it;
/// otherwise `date_cell` holds the raw table cell (`Mar-05-24 09:30AM` or a
/// bare `08:15AM`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHeadline {
    pub category: Option<String>,
    pub ticker: Option<String>,
    pub title: Option<String>,
    pub time: Option<String>,
    pub date_cell: Option<String>,
    pub entities: EntityMap,
}

/// Headline with a resolved timestamp and downstream annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub category: String,
    pub ticker: Option<String>,
    pub title: String,
    pub published_at: NaiveDateTime,
    #[serde(default)]
    pub entities: EntityMap,
    #[serde(default)]
    pub events: Vec<String>,
}

impl NewsItem {
    /// Resolve a raw headline. `clock` carries the last seen table date for
    /// rows that only show a time of day.
    pub fn from_raw(raw: RawHeadline, clock: &mut HeadlineClock, today: NaiveDate) -> Option<Self> {
        let published_at = match (&raw.time, &raw.date_cell) {
            (Some(time), _) => parse_timestamp(time)?,
            (None, Some(cell)) => clock.advance(cell, today)?,
            (None, None) => return None,
        };

        let title = raw.title.filter(|t| !t.trim().is_empty())?;

        Some(NewsItem {
            category: raw.category.unwrap_or_else(|| "general".to_string()),
            ticker: raw.ticker,
            title,
            published_at,
            entities: raw.entities,
            events: Vec::new(),
        })
    }
}

/// Social post as delivered by the Reddit/StockTwits/Nitter collectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSocialPost {
    pub id: String,
    pub source: String,
    pub ticker: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub timestamp: String,
    pub score: i64,
    pub num_comments: i64,
    pub url: Option<String>,
    pub stocktwits_sentiment: Option<String>,
    pub entities: EntityMap,
}

/// Social post with a resolved timestamp and analysis annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub id: String,
    pub source: String,
    pub ticker: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub timestamp: NaiveDateTime,
    pub score: i64,
    pub num_comments: i64,
    pub url: Option<String>,
    pub stocktwits_sentiment: Option<String>,
    /// Title after URL/hashtag/mention/emoji stripping
    pub cleaned_title: String,
    pub sentiment_score: Option<f64>,
    pub influence_score: Option<f64>,
    pub entities: EntityMap,
    pub events: Vec<String>,
}

impl SocialPost {
    /// Posts with an unparseable timestamp are dropped
    pub fn from_raw(raw: RawSocialPost) -> Option<Self> {
        let timestamp = parse_timestamp(&raw.timestamp)?;
        Some(SocialPost {
            id: raw.id,
            source: raw.source,
            ticker: raw.ticker,
            cleaned_title: raw.title.clone(),
            title: raw.title,
            content: raw.content,
            author: raw.author,
            timestamp,
            score: raw.score,
            num_comments: raw.num_comments,
            url: raw.url,
            stocktwits_sentiment: raw.stocktwits_sentiment,
            sentiment_score: None,
            influence_score: None,
            entities: raw.entities,
            events: Vec::new(),
        })
    }

    /// Composite cache key; ids are only unique within a source
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.source, self.id)
    }
}
