//! Timeframe bucketing and two-stage title deduplication for news and social items.
//!
//! Items are first split into 30D / 7D / 24H windows over the same pool. Stage A
//! keeps the earliest copy of each title per category inside a bucket; stage B
//! keeps each title only in the narrowest bucket that contains it.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::data::{NewsItem, SocialPost};

/// Lookback windows, broadest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timeframe {
    D30,
    D7,
    H24,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::D30, Timeframe::D7, Timeframe::H24];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::D30 => "30D",
            Timeframe::D7 => "7D",
            Timeframe::H24 => "24H",
        }
    }

    /// Hours of history the momentum tracker looks at for this bucket
    pub fn momentum_hours(&self) -> i64 {
        match self {
            Timeframe::D30 => 720,
            Timeframe::D7 => 168,
            Timeframe::H24 => 24,
        }
    }

    /// Half-open `[start, end)` window relative to `now`.
    ///
    /// 24H is a rolling window; day windows end at the start of today so the
    /// current partial day only shows up in 24H.
    pub fn window(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let day_start = now.date().and_time(chrono::NaiveTime::MIN);
        match self {
            Timeframe::H24 => (now - Duration::hours(24), now),
            Timeframe::D7 => (day_start - Duration::days(7), day_start),
            Timeframe::D30 => (day_start - Duration::days(30), day_start),
        }
    }

    /// Copies of the items inside this window, oldest first
    pub fn filter<T: TimedItem + Clone>(&self, items: &[T], now: NaiveDateTime) -> Vec<T> {
        let (start, end) = self.window(now);
        let mut selected: Vec<T> = items
            .iter()
            .filter(|item| {
                let ts = item.timestamp();
                ts >= start && ts < end
            })
            .cloned()
            .collect();
        selected.sort_by_key(|item| item.timestamp());
        selected
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything with a title, a grouping category and a timestamp
pub trait TimedItem {
    fn title(&self) -> &str;
    fn category(&self) -> &str;
    fn timestamp(&self) -> NaiveDateTime;
}

impl TimedItem for NewsItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.published_at
    }
}

/// Social posts group by source and dedup on the cleaned title
impl TimedItem for SocialPost {
    fn title(&self) -> &str {
        &self.cleaned_title
    }

    fn category(&self) -> &str {
        &self.source
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// The three window-filtered copies of one item pool
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeBuckets<T> {
    pub d30: Vec<T>,
    pub d7: Vec<T>,
    pub h24: Vec<T>,
}

impl<T: TimedItem + Clone> TimeframeBuckets<T> {
    pub fn split(items: &[T], now: NaiveDateTime) -> Self {
        Self {
            d30: Timeframe::D30.filter(items, now),
            d7: Timeframe::D7.filter(items, now),
            h24: Timeframe::H24.filter(items, now),
        }
    }
}

impl<T> TimeframeBuckets<T> {
    pub fn get(&self, timeframe: Timeframe) -> &[T] {
        match timeframe {
            Timeframe::D30 => &self.d30,
            Timeframe::D7 => &self.d7,
            Timeframe::H24 => &self.h24,
        }
    }

    fn get_mut(&mut self, timeframe: Timeframe) -> &mut Vec<T> {
        match timeframe {
            Timeframe::D30 => &mut self.d30,
            Timeframe::D7 => &mut self.d7,
            Timeframe::H24 => &mut self.h24,
        }
    }

    pub fn total(&self) -> usize {
        self.d30.len() + self.d7.len() + self.h24.len()
    }
}

/// Items removed per timeframe label by each stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    pub within_category: BTreeMap<String, usize>,
    pub cross_timeframe: BTreeMap<String, usize>,
}

impl DedupReport {
    pub fn total_removed(&self) -> usize {
        self.within_category.values().sum::<usize>() + self.cross_timeframe.values().sum::<usize>()
    }
}

/// Stage A: keep the earliest item per (category, title). Ties keep the first
/// seen. Output is ordered by timestamp.
pub fn dedup_within_category<T: TimedItem>(items: Vec<T>) -> (Vec<T>, usize) {
    let before = items.len();
    let mut earliest: BTreeMap<(String, String), T> = BTreeMap::new();

    for item in items {
        let key = (item.category().to_string(), item.title().to_string());
        match earliest.get(&key) {
            Some(kept) if kept.timestamp() <= item.timestamp() => {}
            _ => {
                earliest.insert(key, item);
            }
        }
    }

    let mut kept: Vec<T> = earliest.into_values().collect();
    kept.sort_by_key(|item| item.timestamp());
    let removed = before - kept.len();
    (kept, removed)
}

/// Stage B: drop every copy of a title from a bucket when a narrower bucket
/// also holds it. Returns removal counts for (30D, 7D).
pub fn dedup_across_timeframes<T: TimedItem>(buckets: &mut TimeframeBuckets<T>) -> (usize, usize) {
    let narrow: BTreeSet<String> = buckets.h24.iter().map(|i| i.title().to_string()).collect();

    let before_d7 = buckets.d7.len();
    buckets.d7.retain(|item| !narrow.contains(item.title()));
    let removed_d7 = before_d7 - buckets.d7.len();

    let mut narrower = narrow;
    narrower.extend(buckets.d7.iter().map(|i| i.title().to_string()));

    let before_d30 = buckets.d30.len();
    buckets.d30.retain(|item| !narrower.contains(item.title()));
    let removed_d30 = before_d30 - buckets.d30.len();

    (removed_d30, removed_d7)
}

/// Run both stages over all buckets in place
pub fn deduplicate<T: TimedItem>(buckets: &mut TimeframeBuckets<T>) -> DedupReport {
    let mut report = DedupReport::default();

    for timeframe in Timeframe::ALL {
        let items = std::mem::take(buckets.get_mut(timeframe));
        let (kept, removed) = dedup_within_category(items);
        *buckets.get_mut(timeframe) = kept;
        info!(timeframe = %timeframe, removed, "Removed duplicates within categories");
        report.within_category.insert(timeframe.label().to_string(), removed);
    }

    let (removed_d30, removed_d7) = dedup_across_timeframes(buckets);
    info!(
        removed_30d = removed_d30,
        removed_7d = removed_d7,
        "Cross-timeframe dedup complete"
    );
    report.cross_timeframe.insert(Timeframe::D30.label().to_string(), removed_d30);
    report.cross_timeframe.insert(Timeframe::D7.label().to_string(), removed_d7);
    report.cross_timeframe.insert(Timeframe::H24.label().to_string(), 0);

    report
}
