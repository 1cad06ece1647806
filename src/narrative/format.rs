//! Number and value formatting shared by the narrative renderers.
//! Output formats are fixed; downstream consumers diff summaries across days.

use serde_json::Value;

use crate::data::parse_timestamp;

/// Characters stripped from numeric strings before parsing ("$1,234.5B", "3.2%")
const NUMERIC_NOISE: &[char] = &['%', ',', '$', 'B', 'M', 'K'];

/// Lenient numeric parse: numbers pass through, strings are stripped of
/// unit/currency noise, everything else is absent.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !NUMERIC_NOISE.contains(c)).collect();
    cleaned.trim().parse().ok()
}

/// Thousands-separated fixed-point rendering (`1234.5` → `1,234.50`)
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value);
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3);
    grouped.push_str(sign);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Currency-style number with prefix, `N/A` when absent
pub fn format_number(value: Option<f64>, prefix: &str, decimals: usize) -> String {
    match value {
        Some(v) => format!("{}{}", prefix, format_grouped(v, decimals)),
        None => "N/A".to_string(),
    }
}

/// Dollar amount with two decimals
pub fn format_currency(value: f64) -> String {
    format_number(Some(value), "$", 2)
}

/// Absolute and percentage change from open to close
pub fn calculate_change(open: f64, close: f64) -> Option<(f64, f64)> {
    if open == 0.0 {
        return None;
    }
    let change = close - open;
    Some((change, change / open * 100.0))
}

pub fn interpret_rsi(rsi: Option<f64>) -> &'static str {
    match rsi {
        None => "no RSI data",
        Some(v) if v < 30.0 => "oversold conditions, potential buying opportunity",
        Some(v) if v < 45.0 => "bearish momentum",
        Some(v) if v < 55.0 => "neutral momentum",
        Some(v) if v < 70.0 => "bullish momentum",
        Some(_) => "overbought conditions, potential reversal risk",
    }
}

pub fn interpret_macd(macd: Option<f64>) -> &'static str {
    match macd {
        None => "no MACD data",
        Some(v) if v.abs() < 0.5 => "neutral momentum",
        Some(v) if v > 0.0 => "positive momentum",
        Some(_) => "negative momentum",
    }
}

/// Text form of a loosely-typed field; null, empty, false and zero count as absent
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Whether a payload has anything worth rendering
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Bool(true) => true,
    }
}

/// `March 2024` for an ISO date/datetime
pub fn month_year(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%B %Y").to_string())
}

/// `June 01, 2024` for an ISO date/datetime
pub fn long_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("%B %d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_strips_units() {
        assert_eq!(parse_numeric(&json!("1.23B")), Some(1.23));
        assert_eq!(parse_numeric(&json!("$1,234.50")), Some(1234.5));
        assert_eq!(parse_numeric(&json!(" 3.2% ")), Some(3.2));
        assert_eq!(parse_numeric(&json!("-250K")), Some(-250.0));
        assert_eq!(parse_numeric(&json!(42)), Some(42.0));
    }

    #[test]
    fn test_parse_numeric_absent_values() {
        assert_eq!(parse_numeric(&json!("N/A")), None);
        assert_eq!(parse_numeric(&json!("")), None);
        assert_eq!(parse_numeric(&Value::Null), None);
        assert_eq!(parse_numeric(&json!([1, 2])), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(2300.0, 2), "2,300.00");
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-15.0, 2), "-15.00");
        assert_eq!(format_grouped(-1234.5, 1), "-1,234.5");
        assert_eq!(format_grouped(0.5, 2), "0.50");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(2315.0), "$", 2), "$2,315.00");
        assert_eq!(format_number(Some(30.0), "", 2), "30.00");
        assert_eq!(format_number(None, "$", 2), "N/A");
        assert_eq!(format_currency(1.5), "$1.50");
    }

    #[test]
    fn test_calculate_change() {
        let (change, pct) = calculate_change(2300.0, 2315.0).expect("non-zero open");
        assert!((change - 15.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", pct), "0.65");
        assert_eq!(calculate_change(0.0, 10.0), None);
    }

    #[test]
    fn test_rsi_thresholds() {
        assert_eq!(interpret_rsi(Some(29.99)), "oversold conditions, potential buying opportunity");
        assert_eq!(interpret_rsi(Some(30.0)), "bearish momentum");
        assert_eq!(interpret_rsi(Some(45.0)), "neutral momentum");
        assert_eq!(interpret_rsi(Some(55.0)), "bullish momentum");
        assert_eq!(interpret_rsi(Some(70.0)), "overbought conditions, potential reversal risk");
        assert_eq!(interpret_rsi(None), "no RSI data");
    }

    #[test]
    fn test_macd_thresholds() {
        assert_eq!(interpret_macd(Some(0.49)), "neutral momentum");
        assert_eq!(interpret_macd(Some(-0.49)), "neutral momentum");
        assert_eq!(interpret_macd(Some(0.5)), "positive momentum");
        assert_eq!(interpret_macd(Some(-0.5)), "negative momentum");
        assert_eq!(interpret_macd(None), "no MACD data");
    }

    #[test]
    fn test_display_text_truthiness() {
        assert_eq!(display_text(&json!("2.5%")), Some("2.5%".to_string()));
        assert_eq!(display_text(&json!(187)), Some("187".to_string()));
        assert_eq!(display_text(&json!("")), None);
        assert_eq!(display_text(&json!(0)), None);
        assert_eq!(display_text(&Value::Null), None);
    }

    #[test]
    fn test_date_headers() {
        assert_eq!(long_date("2024-06-01").as_deref(), Some("June 01, 2024"));
        assert_eq!(long_date("2024-06-01T07:00:00.5").as_deref(), Some("June 01, 2024"));
        assert_eq!(month_year("2024-04-01").as_deref(), Some("April 2024"));
        assert_eq!(long_date("someday"), None);
    }
}
