//! News layer: collected headlines -> deduplicated 30D/7D/24H intelligence blocks

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    config::Config,
    data::{sources::decode_list, sources::read_json, HeadlineClock, NewsItem, RawHeadline},
    dedup::{deduplicate, DedupReport, Timeframe, TimeframeBuckets},
    sentiment::{
        detect_contradictions, entity_frequency, event_frequency,
        text::{clean_headline, extract_news_events, is_question},
        Contradiction,
    },
};

pub const NEWS_LAYER_FILE: &str = "news_sentiment_layer.json";
const NEWS_SOURCE: &str = "FinViz";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Tickers whose FinViz headline tables are collected, by category
pub const TRACKED_TICKERS: &[(&str, &[&str])] = &[
    ("gold", &["GLD", "IAU", "GLDM", "GDX", "GDXJ", "NUGT", "RING", "SGOL", "AAAU"]),
    ("market", &["SPY", "QQQ", "DIA", "IWM"]),
    ("volatility", &["VXX", "VIXY", "UVXY", "VIXM", "SVXY", "SVIX", "UVIX"]),
    ("dollar", &["UUP", "USDU"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineView {
    pub category: String,
    pub ticker: Option<String>,
    pub title: String,
    pub time: String,
    pub is_question: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsTimeframeBlock {
    pub timeframe: &'static str,
    pub total_articles: usize,
    pub by_category: BTreeMap<String, usize>,
    pub raw_headlines: Vec<HeadlineView>,
    pub contradictions: Vec<Contradiction>,
    pub entity_frequency: BTreeMap<String, Vec<(String, usize)>>,
    pub event_frequency: Vec<(String, usize)>,
}

impl NewsTimeframeBlock {
    fn from_items(timeframe: Timeframe, items: &[NewsItem]) -> Self {
        let mut by_category = BTreeMap::new();
        for item in items {
            *by_category.entry(item.category.clone()).or_insert(0) += 1;
        }

        let raw_headlines = items
            .iter()
            .map(|item| HeadlineView {
                category: item.category.clone(),
                ticker: item.ticker.clone(),
                title: item.title.clone(),
                time: item.published_at.format(TIME_FORMAT).to_string(),
                is_question: is_question(&item.title),
            })
            .collect();

        Self {
            timeframe: timeframe.label(),
            total_articles: items.len(),
            by_category,
            raw_headlines,
            contradictions: detect_contradictions(items),
            entity_frequency: entity_frequency(items.iter().map(|i| &i.entities)),
            event_frequency: event_frequency(items.iter().map(|i| &i.events)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsLayer {
    pub fetch_time: String,
    pub source: &'static str,
    pub categories: BTreeMap<&'static str, &'static [&'static str]>,
    pub dedup: DedupReport,
    #[serde(rename = "30D")]
    pub d30: NewsTimeframeBlock,
    #[serde(rename = "7D")]
    pub d7: NewsTimeframeBlock,
    #[serde(rename = "24H")]
    pub h24: NewsTimeframeBlock,
}

impl NewsLayer {
    pub fn block(&self, timeframe: Timeframe) -> &NewsTimeframeBlock {
        match timeframe {
            Timeframe::D30 => &self.d30,
            Timeframe::D7 => &self.d7,
            Timeframe::H24 => &self.h24,
        }
    }
}

/// Resolve, clean and tag raw headlines. Each ticker's rows get their own
/// headline clock; rows that can't be dated or have no title are dropped.
pub fn resolve_headlines(raw: Vec<RawHeadline>, today: NaiveDate) -> Vec<NewsItem> {
    let mut clock = HeadlineClock::new();
    let mut current_ticker: Option<String> = None;
    let mut items = Vec::with_capacity(raw.len());

    for mut headline in raw {
        if headline.ticker != current_ticker {
            clock = HeadlineClock::new();
            current_ticker = headline.ticker.clone();
        }
        headline.title = headline.title.as_deref().map(clean_headline);

        if let Some(mut item) = NewsItem::from_raw(headline, &mut clock, today) {
            item.events = extract_news_events(&item.title);
            items.push(item);
        }
    }

    items
}

pub fn build_news_layer(items: &[NewsItem], now: NaiveDateTime) -> NewsLayer {
    let mut buckets = TimeframeBuckets::split(items, now);
    info!(
        d30 = buckets.d30.len(),
        d7 = buckets.d7.len(),
        h24 = buckets.h24.len(),
        "Headlines bucketed before dedup"
    );
    let dedup = deduplicate(&mut buckets);

    NewsLayer {
        fetch_time: now.format(TIME_FORMAT).to_string(),
        source: NEWS_SOURCE,
        categories: TRACKED_TICKERS.iter().copied().collect(),
        dedup,
        d30: NewsTimeframeBlock::from_items(Timeframe::D30, &buckets.d30),
        d7: NewsTimeframeBlock::from_items(Timeframe::D7, &buckets.d7),
        h24: NewsTimeframeBlock::from_items(Timeframe::H24, &buckets.h24),
    }
}

/// Accepts `{"headlines": [...]}` or a bare list
pub(crate) fn list_payload<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key).and_then(Value::as_array).or_else(|| value.as_array())
}

pub(crate) fn write_layer<T: Serialize>(dir: &Path, file_name: &str, layer: &T) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file_name);
    let body = serde_json::to_string_pretty(layer).context("Failed to serialize layer")?;
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub struct NewsOrchestrator {
    config: Config,
}

impl NewsOrchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self, input: &Path) -> Result<(NewsLayer, PathBuf)> {
        let now = self.config.get_effective_datetime();
        let today = self.config.get_effective_date();

        let name = input.file_name().and_then(|n| n.to_str()).unwrap_or("news");
        let document = read_json(input, name).with_context(|| format!("Failed to read {}", input.display()))?;
        let raw: Vec<RawHeadline> = decode_list(name, list_payload(&document, "headlines"));
        let items = resolve_headlines(raw, today);
        info!(articles = items.len(), "Headlines resolved");

        let layer = build_news_layer(&items, now);
        for timeframe in Timeframe::ALL {
            let block = layer.block(timeframe);
            info!(
                timeframe = %timeframe,
                articles = block.total_articles,
                contradictions = block.contradictions.len(),
                "News timeframe aggregated"
            );
        }

        let path = write_layer(&self.config.paths.layer_dir, NEWS_LAYER_FILE, &layer)?;
        info!(path = %path.display(), "News layer saved");
        Ok((layer, path))
    }
}
