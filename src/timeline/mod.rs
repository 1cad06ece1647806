//! Temporal reconciliation: heterogeneous sources folded onto one per-day timeline

pub mod builder;
pub mod monthly;

pub use builder::TimelineBuilder;
pub use monthly::{IndicatorEntry, MonthlyIndicators};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::data::{CalendarEvent, NewsHeadline, PriceBar, SocialPostRecord};

/// Daily metrics carrying full history, one observation per date
pub const DAILY_INDICATORS: &[&str] = &["TREASURY_10Y", "HY_CREDIT_SPREAD"];

/// ETF series reported as `{date, close, volume}`
pub const ETF_INDICATORS: &[&str] = &["GLD", "IAU"];

/// Weekly metrics, one observation per release date
pub const WEEKLY_INDICATORS: &[&str] = &["JOBLESS_CLAIMS"];

/// Monthly metrics; the whole series lands on the `{CODE}_END_DATE` date
pub const MONTHLY_INDICATORS: &[&str] = &[
    "CPI",
    "PCE",
    "PPI",
    "UNEMPLOYMENT",
    "NFP",
    "FEDFUNDS",
    "M2_MONEY_SUPPLY",
    "RETAIL_SALES",
    "INDUSTRIAL_PROD",
    "HOUSING_STARTS",
];

/// Derived scalars with their own end date
pub const DERIVED_INDICATORS: &[&str] = &["REAL_RATE"];

/// Everything known about one calendar day.
///
/// Empty categories are never serialized, so a persisted snapshot only
/// contains the sections that actually had data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDateRecord {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fundamentals: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub market_analysis: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xauusd: Option<PriceBar>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub economic_events: Vec<CalendarEvent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsHeadline>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reddit: Vec<SocialPostRecord>,
}

impl PerDateRecord {
    pub fn is_empty(&self) -> bool {
        self.fundamentals.is_empty()
            && self.market_analysis.is_empty()
            && self.xauusd.is_none()
            && self.economic_events.is_empty()
            && self.news.is_empty()
            && self.reddit.is_empty()
    }
}

/// Calendar date → per-date record, ordered by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    days: BTreeMap<NaiveDate, PerDateRecord>,
}

impl Timeline {
    pub fn get(&self, date: NaiveDate) -> Option<&PerDateRecord> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn oldest(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn newest(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &PerDateRecord)> {
        self.days.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_categories_are_not_serialized() {
        let mut record = PerDateRecord::default();
        record.fundamentals.insert("TREASURY_10Y".into(), json!(4.21));

        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value, json!({"fundamentals": {"TREASURY_10Y": 4.21}}));
    }

    #[test]
    fn test_null_scalars_pass_through() {
        let mut record = PerDateRecord::default();
        record.market_analysis.insert("XAUUSD_RSI".into(), Value::Null);

        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value, json!({"market_analysis": {"XAUUSD_RSI": null}}));
        assert!(!record.is_empty());
    }

    #[test]
    fn test_record_round_trips_through_snapshot_json() {
        let raw = json!({
            "xauusd": {"open": 2300, "high": 2320, "low": 2290, "close": 2315},
            "news": [{"category": "gold", "title": "Gold climbs", "ticker": "GLD"}]
        });
        let record: PerDateRecord = serde_json::from_value(raw.clone()).expect("deserializes");
        assert_eq!(record.news.len(), 1);
        assert_eq!(serde_json::to_value(&record).expect("serializes"), raw);
    }
}
