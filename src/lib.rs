// GoldPulse - daily gold market briefing pipeline
// Folds collector output (fundamentals, prices, calendar, news, social) into
// per-day snapshots, renders plain-text summaries, and builds deduplicated
// 30D/7D/24H news and social sentiment layers.

#![deny(clippy::unwrap_used)]

pub mod config;
pub mod data;
pub mod db;
pub mod dedup;
pub mod narrative;
pub mod orchestrator;
pub mod sentiment;
pub mod snapshot;
pub mod timeline;

// Re-export commonly used items
pub use config::Config;
pub use data::{DataError, DataResult, NewsItem, SocialPost};
pub use dedup::Timeframe;
pub use timeline::{Timeline, TimelineBuilder};
