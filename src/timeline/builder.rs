//! Folds every source into one `CalendarDate → PerDateRecord` mapping.
//!
//! Scalar metrics and ticks overwrite on date collision, list-valued sources
//! (calendar events, news, social posts) append. Records whose date cannot be
//! normalized are dropped without error; partial data is the normal case.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{
    PerDateRecord, Timeline, DAILY_INDICATORS, DERIVED_INDICATORS, ETF_INDICATORS,
    MONTHLY_INDICATORS, WEEKLY_INDICATORS,
};
use crate::data::dates::{date_from_value, parse_calendar_date};
use crate::data::{CalendarEvent, MarketAnalysisTick, NewsHeadline, PriceBar, SocialPostRecord, SourceBundle};

#[derive(Debug, Default)]
pub struct TimelineBuilder {
    days: BTreeMap<NaiveDate, PerDateRecord>,
    dropped: usize,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every source of a bundle in one go
    pub fn from_sources(bundle: &SourceBundle) -> Timeline {
        let mut builder = TimelineBuilder::new();
        if let Some(fundamentals) = &bundle.fundamentals {
            builder.add_fundamentals(fundamentals);
        }
        builder
            .add_market_analysis(&bundle.market_analysis)
            .add_price_bars(&bundle.price_bars)
            .add_calendar_events(&bundle.calendar_events)
            .add_headlines(&bundle.headlines)
            .add_social_posts(&bundle.social_posts);
        builder.build()
    }

    fn day(&mut self, date: NaiveDate) -> &mut PerDateRecord {
        self.days.entry(date).or_default()
    }

    fn resolve(&mut self, raw: Option<&str>) -> Option<NaiveDate> {
        let date = raw.and_then(parse_calendar_date);
        if date.is_none() {
            self.dropped += 1;
        }
        date
    }

    /// Fundamentals mapping: indicator code → observations, plus `{CODE}_END_DATE` siblings
    pub fn add_fundamentals(&mut self, data: &Map<String, Value>) -> &mut Self {
        for key in DAILY_INDICATORS.iter().chain(WEEKLY_INDICATORS) {
            for entry in observations(data, key) {
                if let Some(date) = self.resolve(entry.get("date").and_then(Value::as_str)) {
                    let value = entry.get("value").cloned().unwrap_or(Value::Null);
                    self.day(date).fundamentals.insert(key.to_string(), value);
                }
            }
        }

        for etf in ETF_INDICATORS {
            for entry in observations(data, etf) {
                if let Some(date) = self.resolve(entry.get("date").and_then(Value::as_str)) {
                    let close = entry.get("close").cloned().unwrap_or(Value::Null);
                    let volume = entry.get("volume").cloned().unwrap_or(Value::Null);
                    let fundamentals = &mut self.day(date).fundamentals;
                    fundamentals.insert(format!("{}_CLOSE", etf), close);
                    fundamentals.insert(format!("{}_VOLUME", etf), volume);
                }
            }
        }

        // Monthly series attach once, to the official end date, never per observation
        for key in MONTHLY_INDICATORS {
            let Some(series) = data.get(*key).filter(|v| v.as_array().is_some_and(|a| !a.is_empty()))
            else {
                continue;
            };
            match date_from_value(data.get(&format!("{}_END_DATE", key))) {
                Some(end_date) => {
                    self.day(end_date).fundamentals.insert(key.to_string(), series.clone());
                }
                None => debug!(indicator = key, "Monthly indicator has no end date, skipping"),
            }
        }

        for key in DERIVED_INDICATORS {
            let Some(value) = data.get(*key).filter(|v| !v.is_null()) else {
                continue;
            };
            if let Some(end_date) = date_from_value(data.get(&format!("{}_END_DATE", key))) {
                self.day(end_date).fundamentals.insert(key.to_string(), value.clone());
            }
        }

        self
    }

    /// Technical ticks keyed by `(instrument, date)`; later ticks win
    pub fn add_market_analysis(&mut self, ticks: &[MarketAnalysisTick]) -> &mut Self {
        for tick in ticks {
            let Some(date) = self.resolve(tick.timestamp.as_deref()) else {
                continue;
            };
            let instrument = tick.instrument.as_deref().unwrap_or("UNKNOWN");
            let analysis = &mut self.day(date).market_analysis;
            analysis.insert(format!("{}_PRICE", instrument), tick.current_price.clone());
            analysis.insert(format!("{}_BIAS", instrument), tick.final_bias.clone());

            if let Some(indicators) = &tick.indicators {
                analysis.insert(format!("{}_RSI", instrument), indicators.rsi_value.clone());
                analysis.insert(format!("{}_MACD", instrument), indicators.macd_value.clone());
            }
        }
        self
    }

    /// One bar per date; the last bar seen for a date wins
    pub fn add_price_bars(&mut self, bars: &[PriceBar]) -> &mut Self {
        for bar in bars {
            if let Some(date) = self.resolve(bar.time.as_deref()) {
                self.day(date).xauusd = Some(bar.clone());
            }
        }
        self
    }

    pub fn add_calendar_events(&mut self, events: &[CalendarEvent]) -> &mut Self {
        for event in events {
            if let Some(date) = self.resolve(event.date.as_deref()) {
                self.day(date).economic_events.push(event.clone());
            }
        }
        self
    }

    pub fn add_headlines(&mut self, headlines: &[NewsHeadline]) -> &mut Self {
        for headline in headlines {
            if let Some(date) = self.resolve(headline.time.as_deref()) {
                self.day(date).news.push(headline.clone());
            }
        }
        self
    }

    pub fn add_social_posts(&mut self, posts: &[SocialPostRecord]) -> &mut Self {
        for post in posts {
            if let Some(date) = self.resolve(post.time.as_deref()) {
                self.day(date).reddit.push(post.clone());
            }
        }
        self
    }

    /// Finish the fold, dropping days that ended up with no content
    pub fn build(self) -> Timeline {
        let mut days = self.days;
        days.retain(|_, record| !record.is_empty());

        info!(days = days.len(), dropped_records = self.dropped, "Timeline built");
        Timeline { days }
    }
}

fn observations<'a>(data: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
