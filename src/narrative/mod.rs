//! Plain-text daily summaries rendered from snapshot artifacts

pub mod format;
pub mod sections;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::warn;

use crate::data::DataResult;
use format::{has_content, long_date};

pub use format::parse_numeric;

const FOOTER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot categories in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeCategory {
    GoldPrice,
    EconomicEvents,
    Fundamentals,
    TechnicalAnalysis,
    News,
    Social,
}

impl NarrativeCategory {
    pub const ALL: [NarrativeCategory; 6] = [
        NarrativeCategory::GoldPrice,
        NarrativeCategory::EconomicEvents,
        NarrativeCategory::Fundamentals,
        NarrativeCategory::TechnicalAnalysis,
        NarrativeCategory::News,
        NarrativeCategory::Social,
    ];

    /// Key of the category inside a snapshot's `data`
    pub fn key(&self) -> &'static str {
        match self {
            NarrativeCategory::GoldPrice => "xauusd",
            NarrativeCategory::EconomicEvents => "economic_events",
            NarrativeCategory::Fundamentals => "fundamentals",
            NarrativeCategory::TechnicalAnalysis => "market_analysis",
            NarrativeCategory::News => "news",
            NarrativeCategory::Social => "reddit",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NarrativeCategory::GoldPrice => "GOLD PRICE ACTION",
            NarrativeCategory::EconomicEvents => "ECONOMIC EVENTS",
            NarrativeCategory::Fundamentals => "FUNDAMENTALS",
            NarrativeCategory::TechnicalAnalysis => "TECHNICAL ANALYSIS",
            NarrativeCategory::News => "NEWS HIGHLIGHTS",
            NarrativeCategory::Social => "SOCIAL SENTIMENT",
        }
    }

    pub fn render(&self, payload: &Value) -> DataResult<Option<String>> {
        match self {
            NarrativeCategory::GoldPrice => sections::render_gold(payload),
            NarrativeCategory::EconomicEvents => sections::render_economic_events(payload),
            NarrativeCategory::Fundamentals => sections::render_fundamentals(payload),
            NarrativeCategory::TechnicalAnalysis => sections::render_market_analysis(payload),
            NarrativeCategory::News => sections::render_news(payload),
            NarrativeCategory::Social => sections::render_social(payload),
        }
    }
}

/// Render a daily snapshot (`{date, data}`) as a summary document.
///
/// A category whose renderer fails is replaced by an inline error line so
/// the rest of the document still renders.
pub fn render_snapshot(snapshot: &Value, footer: NaiveDateTime) -> String {
    let header = match snapshot.get("date") {
        Some(Value::String(raw)) => long_date(raw).unwrap_or_else(|| raw.clone()),
        Some(other) if !other.is_null() => other.to_string(),
        _ => "Unknown Date".to_string(),
    };

    let mut lines = vec![header, String::new()];

    if let Some(data) = snapshot.get("data") {
        for category in NarrativeCategory::ALL {
            let Some(payload) = data.get(category.key()).filter(|v| has_content(v)) else {
                continue;
            };
            match category.render(payload) {
                Ok(Some(text)) => {
                    lines.push(format!("{}:", category.title()));
                    lines.push(text);
                    lines.push(String::new());
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(category = category.key(), error = %e, "Category failed to render");
                    lines.push(format!("{}: [Error processing data: {}]", category.title(), e));
                    lines.push(String::new());
                }
            }
        }
    }

    lines.push(footer.format(FOOTER_FORMAT).to_string());
    lines.join("\n")
}

/// Render the monthly indicators artifact as its own document
pub fn render_monthly_document(artifact: &Value, footer: NaiveDateTime) -> String {
    let header = artifact
        .get("generated_at")
        .and_then(Value::as_str)
        .and_then(long_date)
        .unwrap_or_else(|| "Monthly Indicators".to_string());

    let body = sections::render_monthly_indicators(artifact)
        .unwrap_or_else(|| "No economic data available.".to_string());

    [header, String::new(), body, String::new(), footer.format(FOOTER_FORMAT).to_string()].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn footer() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 2)
            .and_then(|d| d.and_hms_opt(6, 30, 0))
            .expect("valid footer time")
    }

    #[test]
    fn test_category_order_and_keys() {
        let titles: Vec<&str> = NarrativeCategory::ALL.iter().map(|c| c.title()).collect();
        assert_eq!(
            titles,
            vec![
                "GOLD PRICE ACTION",
                "ECONOMIC EVENTS",
                "FUNDAMENTALS",
                "TECHNICAL ANALYSIS",
                "NEWS HIGHLIGHTS",
                "SOCIAL SENTIMENT"
            ]
        );
        assert_eq!(NarrativeCategory::Social.key(), "reddit");
    }

    #[test]
    fn test_render_snapshot_layout() {
        let snapshot = json!({
            "date": "2024-06-01",
            "data": {
                "reddit": [{"title": "Stacking more", "source": "r/Silverbugs"}],
                "xauusd": {"open": 2300, "high": 2320, "low": 2290, "close": 2315},
                "fundamentals": {}
            }
        });

        let text = render_snapshot(&snapshot, footer());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "June 01, 2024");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "GOLD PRICE ACTION:");
        assert!(lines[3].contains("opened at $2,300.00"));
        assert!(!text.contains("FUNDAMENTALS"));
        assert!(text.find("GOLD PRICE ACTION").expect("gold") < text.find("SOCIAL SENTIMENT").expect("social"));
        assert_eq!(lines.last().copied(), Some("2024-06-02 06:30:00"));
    }

    #[test]
    fn test_failed_category_becomes_inline_error() {
        let snapshot = json!({
            "date": "2024-06-01",
            "data": {
                "economic_events": {"not": "a list"},
                "news": [{"category": "gold", "title": "Gold steady"}]
            }
        });

        let text = render_snapshot(&snapshot, footer());
        assert!(text.contains("ECONOMIC EVENTS: [Error processing data:"));
        assert!(text.contains("NEWS HIGHLIGHTS:\n\nGOLD (1 items):"));
    }

    #[test]
    fn test_unparseable_or_missing_date_header() {
        let text = render_snapshot(&json!({"date": "sometime", "data": {}}), footer());
        assert!(text.starts_with("sometime\n\n"));

        let text = render_snapshot(&json!({}), footer());
        assert_eq!(text, "Unknown Date\n\n2024-06-02 06:30:00");
    }

    #[test]
    fn test_monthly_document() {
        let text = render_monthly_document(&json!({"generated_at": "2024-06-01T07:00:00", "indicators": {}}), footer());
        assert_eq!(
            text,
            "June 01, 2024\n\nNo inflation data available for this period.\n\n2024-06-02 06:30:00"
        );

        let text = render_monthly_document(&json!({}), footer());
        assert!(text.starts_with("Monthly Indicators\n\nNo economic data available."));
    }
}
