//! Monthly inflation and economic indicators, kept as one standalone artifact
//! next to the daily snapshots so the full series can be read in one place.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{DERIVED_INDICATORS, MONTHLY_INDICATORS};

pub const MONTHLY_ARTIFACT_FILE: &str = "inflation_data.json";

const DEFAULT_DATA_SOURCE: &str = "Federal Reserve Economic Data (FRED)";
const DESCRIPTION: &str = "Monthly inflation and economic indicators";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIndicators {
    pub generated_at: NaiveDateTime,
    pub data_source: String,
    pub description: String,
    pub indicators: BTreeMap<String, IndicatorEntry>,
}

/// Either a monthly series (`data`) or a derived scalar (`value`), with its end date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub end_date: Value,
}

impl MonthlyIndicators {
    /// Extract the monthly indicators from a fundamentals source.
    /// Returns `None` when the source carries none of them.
    pub fn extract(data: &Map<String, Value>, generated_at: NaiveDateTime) -> Option<Self> {
        let end_date = |key: &str| data.get(&format!("{}_END_DATE", key)).cloned().unwrap_or(Value::Null);
        let mut indicators = BTreeMap::new();

        for key in MONTHLY_INDICATORS {
            if let Some(series) = data.get(*key).filter(|v| !v.is_null()) {
                indicators.insert(
                    key.to_string(),
                    IndicatorEntry {
                        data: Some(series.clone()),
                        value: None,
                        end_date: end_date(*key),
                    },
                );
            }
        }

        for key in DERIVED_INDICATORS {
            if let Some(value) = data.get(*key).filter(|v| !v.is_null()) {
                indicators.insert(
                    key.to_string(),
                    IndicatorEntry {
                        data: None,
                        value: Some(value.clone()),
                        end_date: end_date(*key),
                    },
                );
            }
        }

        if indicators.is_empty() {
            return None;
        }

        let data_source = data
            .get("data_source")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DATA_SOURCE)
            .to_string();

        Some(MonthlyIndicators {
            generated_at,
            data_source,
            description: DESCRIPTION.to_string(),
            indicators,
        })
    }
}
