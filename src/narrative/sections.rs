//! Per-category renderers: one snapshot category payload in, one paragraph out.
//!
//! `Ok(None)` means the payload was too thin to say anything; `Err` means the
//! payload had the wrong shape and the document gets an inline error instead.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::format::{
    calculate_change, display_text, format_currency, format_grouped, format_number,
    interpret_macd, interpret_rsi, month_year, parse_numeric,
};
use crate::data::{DataError, DataResult};

const UNCHANGED_TOLERANCE: f64 = 0.01;

fn expect_object<'a>(category: &str, payload: &'a Value) -> DataResult<&'a Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| DataError::render_error(category, "expected an object"))
}

fn expect_list<'a>(category: &str, payload: &'a Value) -> DataResult<&'a Vec<Value>> {
    payload
        .as_array()
        .ok_or_else(|| DataError::render_error(category, "expected a list"))
}

fn numeric_field(data: &Map<String, Value>, key: &str) -> Option<f64> {
    data.get(key).and_then(parse_numeric)
}

/// Daily OHLC bar. Any missing or zero price yields nothing.
pub fn render_gold(payload: &Value) -> DataResult<Option<String>> {
    let bar = expect_object("xauusd", payload)?;

    let field = |key| numeric_field(bar, key).filter(|v| *v != 0.0);
    let (Some(open), Some(high), Some(low), Some(close)) =
        (field("open"), field("high"), field("low"), field("close"))
    else {
        return Ok(None);
    };

    let Some((change, pct_change)) = calculate_change(open, close) else {
        return Ok(None);
    };

    let (direction, change_text, pct_text) = if change.abs() < 0.01 {
        ("no significant change", "flat".to_string(), "0.00%".to_string())
    } else if change > 0.0 {
        (
            "gain",
            format!("+{}", format_grouped(change, 2)),
            format!("+{:.2}%", pct_change),
        )
    } else {
        ("loss", format_grouped(change, 2), format!("{:.2}%", pct_change))
    };

    Ok(Some(format!(
        "Gold (XAU/USD) opened at {}, reached a high of {}, dipped to a low of {}, and closed at {}. \
         This represents a daily {} of {} ({}) with an intraday range of {}.",
        format_currency(open),
        format_currency(high),
        format_currency(low),
        format_currency(close),
        direction,
        change_text,
        pct_text,
        format_grouped(high - low, 2),
    )))
}

/// Calendar releases with beat/miss and rise/fall clauses
pub fn render_economic_events(payload: &Value) -> DataResult<Option<String>> {
    let events = expect_list("economic_events", payload)?;

    let lines: Vec<String> = events
        .iter()
        .filter_map(Value::as_object)
        .map(describe_event)
        .collect();

    Ok((!lines.is_empty()).then(|| lines.join("\n")))
}

fn describe_event(event: &Map<String, Value>) -> String {
    let text_of = |key: &str| event.get(key).and_then(display_text);

    let time = text_of("time").unwrap_or_else(|| "Unknown time".to_string());
    let currency = text_of("currency").unwrap_or_default();
    let name = text_of("event").unwrap_or_else(|| "Unknown event".to_string());

    let mut text = format!("At {}, {} {} was released.", time, currency, name);

    let Some(actual) = text_of("actual") else {
        return text;
    };
    let forecast = text_of("forecast");
    let previous = text_of("previous");
    let actual_num = event.get("actual").and_then(parse_numeric);

    text.push_str(&format!(" Actual: {}", actual));

    match &forecast {
        Some(forecast) if *forecast != actual => {
            match (actual_num, event.get("forecast").and_then(parse_numeric)) {
                (Some(a), Some(f)) if a > f => text.push_str(&format!(", beating forecast of {}", forecast)),
                (Some(a), Some(f)) if a < f => text.push_str(&format!(", missing forecast of {}", forecast)),
                (Some(_), Some(_)) => {}
                _ => text.push_str(&format!(" (forecast: {})", forecast)),
            }
        }
        Some(forecast) => text.push_str(&format!(", matching forecast of {}", forecast)),
        None => {}
    }

    match &previous {
        Some(previous) if *previous != actual => {
            match (actual_num, event.get("previous").and_then(parse_numeric)) {
                (Some(a), Some(p)) => {
                    let change = a - p;
                    if change.abs() > UNCHANGED_TOLERANCE {
                        let direction = if change > 0.0 { "rising" } else { "falling" };
                        text.push_str(&format!(" and {} from previous {}.", direction, previous));
                    } else {
                        text.push_str(&format!(", unchanged from previous {}.", previous));
                    }
                }
                _ => text.push_str(&format!(" (previous: {}).", previous)),
            }
        }
        _ if forecast.is_none() => text.push('.'),
        _ => {}
    }

    text
}

/// Latest value of a fundamentals field: scalars as-is, monthly series by their
/// last observation
fn latest_value(data: &Map<String, Value>, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Array(series) => series.last().and_then(|obs| obs.get("value")).and_then(parse_numeric),
        scalar => parse_numeric(scalar),
    }
}

pub fn render_fundamentals(payload: &Value) -> DataResult<Option<String>> {
    let data = expect_object("fundamentals", payload)?;
    let value = |key| latest_value(data, key);
    let mut lines = Vec::new();

    if let Some(v) = value("TREASURY_10Y") {
        lines.push(format!("10-Year Treasury yield: {:.2}%.", v));
    }
    if let Some(v) = value("HY_CREDIT_SPREAD") {
        lines.push(format!("High-yield credit spread: {:.2}%.", v));
    }
    if let Some(v) = value("CPI") {
        lines.push(format!("Consumer Price Index (CPI): {:.2}.", v));
    }
    if let Some(v) = value("PCE") {
        lines.push(format!("Personal Consumption Expenditures (PCE): {:.2}.", v));
    }
    if let Some(v) = value("PPI") {
        lines.push(format!("Producer Price Index (PPI): {:.2}.", v));
    }
    if let Some(v) = value("UNEMPLOYMENT") {
        lines.push(format!("Unemployment rate: {:.1}%.", v));
    }
    if let Some(v) = value("NFP") {
        lines.push(format!("Non-Farm Payrolls: {}K jobs.", format_grouped(v, 0)));
    }
    if let Some(v) = value("JOBLESS_CLAIMS") {
        lines.push(format!("Initial jobless claims: {}K.", format_grouped(v, 0)));
    }
    if let Some(v) = value("FEDFUNDS") {
        lines.push(format!("Federal Funds Rate: {:.2}%.", v));
    }
    if let Some(v) = value("REAL_RATE") {
        lines.push(format!("Real interest rate: {:.2}%.", v));
    }
    if let Some(v) = value("M2_MONEY_SUPPLY") {
        lines.push(format!("M2 money supply: ${}B.", format_grouped(v, 2)));
    }
    if let Some(v) = value("RETAIL_SALES") {
        lines.push(format!("Retail sales: ${}M.", format_grouped(v, 0)));
    }
    if let Some(v) = value("INDUSTRIAL_PROD") {
        lines.push(format!("Industrial production index: {:.2}.", v));
    }
    if let Some(v) = value("HOUSING_STARTS") {
        lines.push(format!("Housing starts: {}K units.", format_grouped(v, 0)));
    }

    for etf in ["GLD", "IAU"] {
        let mut parts = Vec::new();
        if let Some(close) = numeric_field(data, &format!("{}_CLOSE", etf)) {
            parts.push(format!("closed at {}", format_currency(close)));
        }
        if let Some(volume) = numeric_field(data, &format!("{}_VOLUME", etf)) {
            parts.push(format!("volume {}", format_grouped(volume, 0)));
        }
        if !parts.is_empty() {
            lines.push(format!("{} ETF: {}.", etf, parts.join(", ")));
        }
    }

    Ok((!lines.is_empty()).then(|| lines.join(" ")))
}

fn instrument_name(symbol: &str) -> &str {
    match symbol {
        "XAUUSD" => "Gold (XAU/USD)",
        "USA500.IDX" => "S&P 500",
        "USA100.IDX" => "Nasdaq 100",
        "USA30.IDX" => "Dow Jones",
        "VOL.IDX" => "VIX (Volatility Index)",
        "DOLLAR.IDX" => "US Dollar Index (DXY)",
        "BTC" => "Bitcoin",
        "ETH" => "Ethereum",
        other => other,
    }
}

/// Per-instrument price, bias, RSI and MACD
pub fn render_market_analysis(payload: &Value) -> DataResult<Option<String>> {
    let data = expect_object("market_analysis", payload)?;

    let instruments: BTreeSet<String> = data
        .keys()
        .filter(|key| key.contains("_PRICE"))
        .map(|key| key.replace("_PRICE", ""))
        .collect();

    let mut lines = Vec::new();
    for instrument in &instruments {
        let Some(price) = numeric_field(data, &format!("{}_PRICE", instrument)) else {
            continue;
        };
        // A bias that isn't text means a corrupt tick; skip the instrument
        let bias = match data.get(&format!("{}_BIAS", instrument)) {
            None => "neutral".to_string(),
            Some(Value::String(bias)) => bias.to_lowercase(),
            Some(_) => continue,
        };

        let price_text = if instrument == "XAUUSD" {
            format_currency(price)
        } else {
            format_grouped(price, 2)
        };

        let mut text = format!(
            "{}: trading at {} with {} bias.",
            instrument_name(instrument),
            price_text,
            bias
        );

        let rsi = numeric_field(data, &format!("{}_RSI", instrument));
        if let Some(rsi_value) = rsi {
            text.push_str(&format!(" RSI: {:.2} ({}).", rsi_value, interpret_rsi(rsi)));
        }
        let macd = numeric_field(data, &format!("{}_MACD", instrument));
        if let Some(macd_value) = macd {
            text.push_str(&format!(" MACD: {:.2} ({}).", macd_value, interpret_macd(macd)));
        }

        lines.push(text);
    }

    Ok((!lines.is_empty()).then(|| lines.join("\n")))
}

fn text_field<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Group list items by a string field, keeping input order inside each group
fn group_by<'a>(
    category: &str,
    items: &'a [Value],
    key: &str,
    default: &str,
) -> DataResult<BTreeMap<String, Vec<&'a Map<String, Value>>>> {
    let mut groups: BTreeMap<String, Vec<&Map<String, Value>>> = BTreeMap::new();
    for item in items {
        let item = item
            .as_object()
            .ok_or_else(|| DataError::render_error(category, "list item is not an object"))?;
        let group = text_field(item, key).unwrap_or(default).to_string();
        groups.entry(group).or_default().push(item);
    }
    Ok(groups)
}

pub fn render_news(payload: &Value) -> DataResult<Option<String>> {
    let articles = expect_list("news", payload)?;
    if articles.is_empty() {
        return Ok(None);
    }

    let mut lines = Vec::new();
    let mut total = 0;
    for (category, items) in group_by("news", articles, "category", "general")? {
        lines.push(format!("\n{} ({} items):", category.to_uppercase(), items.len()));
        for item in items {
            let title = text_field(item, "title").unwrap_or_default().trim();
            if title.is_empty() {
                continue;
            }
            let ticker = text_field(item, "ticker").unwrap_or_default().trim();
            if ticker.is_empty() {
                lines.push(format!("  • {}", title));
            } else {
                lines.push(format!("  • {} [{}]", title, ticker));
            }
            total += 1;
        }
    }

    lines.push(format!("\n[Total: {} news items]", total));
    Ok(Some(lines.join("\n")))
}

pub fn render_social(payload: &Value) -> DataResult<Option<String>> {
    let posts = expect_list("reddit", payload)?;
    if posts.is_empty() {
        return Ok(None);
    }

    let mut lines = Vec::new();
    let mut total = 0;
    for (source, items) in group_by("reddit", posts, "source", "unknown")? {
        lines.push(format!("\n{} ({} posts):", source, items.len()));
        for item in items {
            let title = text_field(item, "title").unwrap_or_default().trim();
            if !title.is_empty() {
                lines.push(format!("  • {}", title));
                total += 1;
            }
        }
    }

    lines.push(format!("\n[Total: {} posts tracked]", total));
    Ok(Some(lines.join("\n")))
}

/// Latest observation of a monthly series in the indicators artifact
fn latest_observation<'a>(indicators: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    indicators
        .get(key)?
        .get("data")?
        .as_array()?
        .last()?
        .as_object()
}

fn observation_value(obs: &Map<String, Value>) -> Option<f64> {
    obs.get("value").and_then(parse_numeric)
}

fn observation_month(obs: &Map<String, Value>) -> Option<String> {
    text_field(obs, "date").and_then(month_year)
}

/// "`stem` in Month YYYY." or just "`stem`." when the observation has no usable date
fn dated_sentence(stem: String, obs: &Map<String, Value>, joiner: &str) -> String {
    match observation_month(obs) {
        Some(month) => format!("{} {} {}.", stem, joiner, month),
        None => format!("{}.", stem),
    }
}

/// Monthly indicators artifact rendered as grouped sections
pub fn render_monthly_indicators(artifact: &Value) -> Option<String> {
    let artifact = artifact.as_object().filter(|m| !m.is_empty())?;

    let empty = Map::new();
    let indicators = artifact
        .get("indicators")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    if indicators.is_empty() {
        return Some("No inflation data available for this period.".to_string());
    }

    let mut sections = Vec::new();

    let mut inflation = Vec::new();
    for (key, label, verb) in [
        ("CPI", "Consumer Price Index (CPI)", "stood at"),
        ("PCE", "Personal Consumption Expenditures (PCE)", "was"),
        ("PPI", "Producer Price Index (PPI)", "was"),
    ] {
        if let Some(obs) = latest_observation(indicators, key) {
            if let Some(v) = observation_value(obs) {
                inflation.push(dated_sentence(format!("{} {} {:.2}", label, verb, v), obs, "in"));
            }
        }
    }
    if !inflation.is_empty() {
        sections.push(format!("INFLATION INDICATORS:\n{}", inflation.join(" ")));
    }

    let mut employment = Vec::new();
    if let Some(obs) = latest_observation(indicators, "UNEMPLOYMENT") {
        if let Some(v) = observation_value(obs) {
            employment.push(dated_sentence(format!("Unemployment rate was {:.1}%", v), obs, "in"));
        }
    }
    if let Some(v) = latest_observation(indicators, "NFP").and_then(observation_value) {
        employment.push(format!("Non-Farm Payrolls totaled {}K jobs.", format_grouped(v, 0)));
    }
    if !employment.is_empty() {
        sections.push(format!("EMPLOYMENT:\n{}", employment.join(" ")));
    }

    let mut monetary = Vec::new();
    if let Some(series) = indicators
        .get("FEDFUNDS")
        .and_then(|entry| entry.get("data"))
        .and_then(Value::as_array)
        .filter(|s| !s.is_empty())
    {
        let latest = series.last().and_then(Value::as_object);
        let latest_val = latest.and_then(observation_value);
        if let (Some(obs), Some(v)) = (latest, latest_val) {
            monetary.push(dated_sentence(format!("Federal Funds Rate was {:.2}%", v), obs, "as of"));
        }

        if series.len() > 1 {
            let first_val = series.first().and_then(Value::as_object).and_then(observation_value);
            if let (Some(first), Some(latest)) = (first_val, latest_val) {
                let change = latest - first;
                if change.abs() > UNCHANGED_TOLERANCE {
                    let trend = if change < 0.0 { "down" } else { "up" };
                    monetary.push(format!(
                        "Rate moved {} {:.2} percentage points during this period.",
                        trend,
                        change.abs()
                    ));
                }
            }
        }
    }
    if let Some(v) = latest_observation(indicators, "M2_MONEY_SUPPLY").and_then(observation_value) {
        monetary.push(format!("M2 money supply was {} billion.", format_number(Some(v), "$", 1)));
    }
    if !monetary.is_empty() {
        sections.push(format!("MONETARY POLICY:\n{}", monetary.join(" ")));
    }

    let mut activity = Vec::new();
    if let Some(v) = latest_observation(indicators, "RETAIL_SALES").and_then(observation_value) {
        activity.push(format!("Retail sales totaled {} million.", format_number(Some(v), "$", 0)));
    }
    if let Some(v) = latest_observation(indicators, "INDUSTRIAL_PROD").and_then(observation_value) {
        activity.push(format!("Industrial production index was {:.2}.", v));
    }
    if !activity.is_empty() {
        sections.push(format!("ECONOMIC ACTIVITY:\n{}", activity.join(" ")));
    }

    if sections.is_empty() {
        Some("No economic data available.".to_string())
    } else {
        Some(sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_line(event: Value) -> String {
        render_economic_events(&json!([event]))
            .expect("renders")
            .expect("has text")
    }

    #[test]
    fn test_gold_gain() {
        let text = render_gold(&json!({"open": 2300, "high": 2320, "low": 2290, "close": 2315}))
            .expect("renders")
            .expect("has text");
        assert_eq!(
            text,
            "Gold (XAU/USD) opened at $2,300.00, reached a high of $2,320.00, dipped to a low of \
             $2,290.00, and closed at $2,315.00. This represents a daily gain of +15.00 (+0.65%) \
             with an intraday range of 30.00."
        );
    }

    #[test]
    fn test_gold_loss_and_flat() {
        let loss = render_gold(&json!({"open": "2,315", "high": 2320, "low": 2290, "close": 2300}))
            .expect("renders")
            .expect("has text");
        assert!(loss.contains("daily loss of -15.00 (-0.65%)"));

        let flat = render_gold(&json!({"open": 2300, "high": 2310, "low": 2290, "close": 2300.004}))
            .expect("renders")
            .expect("has text");
        assert!(flat.contains("no significant change of flat (0.00%)"));
    }

    #[test]
    fn test_gold_partial_bar_is_absent() {
        assert_eq!(render_gold(&json!({"open": 2300, "high": 2320, "low": 2290})).expect("ok"), None);
        assert_eq!(
            render_gold(&json!({"open": 0, "high": 2320, "low": 2290, "close": 2300})).expect("ok"),
            None
        );
        assert!(render_gold(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_event_beats_forecast_and_rises() {
        let line = event_line(json!({
            "time": "08:30", "currency": "USD", "event": "Non-Farm Payrolls",
            "actual": "272K", "forecast": "185K", "previous": "165K"
        }));
        assert_eq!(
            line,
            "At 08:30, USD Non-Farm Payrolls was released. Actual: 272K, beating forecast of 185K \
             and rising from previous 165K."
        );
    }

    #[test]
    fn test_event_misses_and_unchanged() {
        let line = event_line(json!({
            "time": "10:00", "currency": "USD", "event": "ISM",
            "actual": "48.7", "forecast": "49.6", "previous": "48.705"
        }));
        assert!(line.ends_with("Actual: 48.7, missing forecast of 49.6, unchanged from previous 48.705."));
    }

    #[test]
    fn test_event_matching_forecast_without_previous() {
        let line = event_line(json!({
            "time": "14:00", "currency": "USD", "event": "Fed Rate",
            "actual": "5.50%", "forecast": "5.50%"
        }));
        assert!(line.ends_with("Actual: 5.50%, matching forecast of 5.50%"));
    }

    #[test]
    fn test_event_non_numeric_falls_back_to_raw_values() {
        let line = event_line(json!({
            "time": "All Day", "currency": "EUR", "event": "Summit",
            "actual": "Hold", "forecast": "Cut", "previous": "Hike"
        }));
        assert!(line.ends_with("Actual: Hold (forecast: Cut) (previous: Hike)."));
    }

    #[test]
    fn test_event_actual_only_and_pending() {
        let line = event_line(json!({"time": "09:00", "currency": "GBP", "event": "GDP", "actual": "0.6%"}));
        assert!(line.ends_with("Actual: 0.6%."));

        let pending = event_line(json!({"time": "09:00", "currency": "GBP", "event": "GDP", "actual": ""}));
        assert_eq!(pending, "At 09:00, GBP GDP was released.");
    }

    #[test]
    fn test_fundamentals_formats() {
        let text = render_fundamentals(&json!({
            "TREASURY_10Y": 4.512,
            "UNEMPLOYMENT": "3.94",
            "NFP": 272000,
            "M2_MONEY_SUPPLY": 20867.3,
            "GLD_CLOSE": 215.3,
            "GLD_VOLUME": 8100000,
            "CPI": [{"date": "2024-03-01", "value": 312.2}, {"date": "2024-04-01", "value": 313.016}]
        }))
        .expect("renders")
        .expect("has text");

        assert_eq!(
            text,
            "10-Year Treasury yield: 4.51%. Consumer Price Index (CPI): 313.02. Unemployment rate: 3.9%. \
             Non-Farm Payrolls: 272,000K jobs. M2 money supply: $20,867.30B. \
             GLD ETF: closed at $215.30, volume 8,100,000."
        );
    }

    #[test]
    fn test_fundamentals_with_only_nulls_is_absent() {
        assert_eq!(render_fundamentals(&json!({"TREASURY_10Y": null})).expect("ok"), None);
    }

    #[test]
    fn test_market_analysis_lines() {
        let text = render_market_analysis(&json!({
            "XAUUSD_PRICE": 2315.5, "XAUUSD_BIAS": "Bullish", "XAUUSD_RSI": 72.1, "XAUUSD_MACD": 3.4,
            "USA500.IDX_PRICE": "5,277.51", "USA500.IDX_BIAS": "Neutral", "USA500.IDX_RSI": 50,
            "BTC_PRICE": null
        }))
        .expect("renders")
        .expect("has text");

        assert_eq!(
            text,
            "S&P 500: trading at 5,277.51 with neutral bias. RSI: 50.00 (neutral momentum).\n\
             Gold (XAU/USD): trading at $2,315.50 with bullish bias. RSI: 72.10 (overbought conditions, \
             potential reversal risk). MACD: 3.40 (positive momentum)."
        );
    }

    #[test]
    fn test_market_analysis_skips_corrupt_bias() {
        let text = render_market_analysis(&json!({"ETH_PRICE": 3800, "ETH_BIAS": 7})).expect("ok");
        assert_eq!(text, None);
    }

    #[test]
    fn test_news_grouping() {
        let text = render_news(&json!([
            {"category": "gold", "title": "Gold climbs ", "ticker": "GLD"},
            {"category": "dollar", "title": "Dollar slips", "ticker": ""},
            {"category": "gold", "title": "", "ticker": "IAU"}
        ]))
        .expect("renders")
        .expect("has text");

        assert_eq!(
            text,
            "\nDOLLAR (1 items):\n  • Dollar slips\n\nGOLD (2 items):\n  • Gold climbs [GLD]\n\n[Total: 2 news items]"
        );
    }

    #[test]
    fn test_social_grouping() {
        let text = render_social(&json!([
            {"title": "Gold to 2500?", "source": "r/Gold"},
            {"title": "Buying the dip"}
        ]))
        .expect("renders")
        .expect("has text");

        assert_eq!(
            text,
            "\nr/Gold (1 posts):\n  • Gold to 2500?\n\nunknown (1 posts):\n  • Buying the dip\n\n[Total: 2 posts tracked]"
        );
        assert!(render_social(&json!(["oops"])).is_err());
    }

    #[test]
    fn test_monthly_indicators_sections() {
        let text = render_monthly_indicators(&json!({
            "generated_at": "2024-06-01T07:00:00",
            "indicators": {
                "CPI": {"data": [{"date": "2024-04-01", "value": 313.016}], "end_date": "2024-04-01"},
                "NFP": {"data": [{"date": "2024-05-01", "value": 158200}], "end_date": "2024-05-01"},
                "FEDFUNDS": {"data": [
                    {"date": "2024-01-01", "value": 5.33},
                    {"date": "2024-05-01", "value": 5.08}
                ], "end_date": "2024-05-01"},
                "RETAIL_SALES": {"data": [{"date": "2024-04-01", "value": "705,000"}], "end_date": null}
            }
        }))
        .expect("has text");

        assert_eq!(
            text,
            "INFLATION INDICATORS:\nConsumer Price Index (CPI) stood at 313.02 in April 2024.\n\n\
             EMPLOYMENT:\nNon-Farm Payrolls totaled 158,200K jobs.\n\n\
             MONETARY POLICY:\nFederal Funds Rate was 5.08% as of May 2024. \
             Rate moved down 0.25 percentage points during this period.\n\n\
             ECONOMIC ACTIVITY:\nRetail sales totaled $705,000 million."
        );
    }

    #[test]
    fn test_monthly_indicators_fallbacks() {
        assert_eq!(render_monthly_indicators(&json!({})), None);
        assert_eq!(
            render_monthly_indicators(&json!({"indicators": {}})).as_deref(),
            Some("No inflation data available for this period.")
        );
        assert_eq!(
            render_monthly_indicators(&json!({"indicators": {"HOUSING_STARTS": {"data": []}}})).as_deref(),
            Some("No economic data available.")
        );
    }
}
