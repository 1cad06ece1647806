//! Date normalization for heterogeneous upstream sources
//!
//! Every source speaks its own dialect: FRED uses ISO dates, the market
//! analysis feed emits ISO datetimes, the economic calendar uses `DD/MM/YYYY`
//! and FinViz headline tables use `Mon-DD-YY HH:MMAM` cells where later rows
//! omit the date entirely. Everything here returns `Option`/`DataResult` and
//! never panics, so callers can drop the offending record and keep going.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use super::{DataError, DataResult};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a date or datetime string into a calendar date.
///
/// Accepted, in priority order: `YYYY-MM-DD`, an ISO datetime with a `T` or
/// space separator (time part discarded), and `DD/MM/YYYY`.
pub fn normalize_date(raw: &str) -> DataResult<NaiveDate> {
    let trimmed = raw.trim();

    // Drop the time-of-day before matching so offsets and fractions don't matter
    let date_part = if let Some((date, _)) = trimmed.split_once('T') {
        date
    } else if trimmed.contains(' ') && trimmed.contains(':') {
        trimmed.split_whitespace().next().unwrap_or_default()
    } else {
        trimmed
    };

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| DataError::InvalidDate(raw.to_string()))
}

/// Lenient variant of [`normalize_date`] for batch folding.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    normalize_date(raw).ok()
}

/// Calendar date from a JSON field; non-string values are treated as absent.
pub fn date_from_value(value: Option<&Value>) -> Option<NaiveDate> {
    value.and_then(Value::as_str).and_then(parse_calendar_date)
}

/// Parse a timestamp into naive wall-clock time.
///
/// RFC 3339 values with an offset (`Z`, `+02:00`) are converted to UTC; naive
/// ISO datetimes are taken as-is and a bare date maps to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Cursor over a FinViz-style headline table.
///
/// Only the first row of each day carries a date (`Mar-05-24 09:30AM`); the
/// following rows show a bare time (`08:15AM`) that belongs to the last date
/// seen. The carried date is explicit state so each table gets its own clock.
#[derive(Debug, Clone, Default)]
pub struct HeadlineClock {
    last_date: Option<NaiveDate>,
}

impl HeadlineClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date inherited by the next bare-time row
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// Resolve one table cell to a timestamp, updating the carried date.
    ///
    /// Unparseable cells return `None` and leave the carried date untouched.
    pub fn advance(&mut self, cell: &str, today: NaiveDate) -> Option<NaiveDateTime> {
        let mut parts = cell.split_whitespace();
        let (date_token, time_token) = match (parts.next(), parts.next()) {
            (Some(date), Some(time)) => (Some(date), time),
            (Some(time), None) => (None, time),
            (None, _) => (None, "12:00AM"),
        };

        let time = NaiveTime::parse_from_str(&time_token.to_uppercase(), "%I:%M%p").ok()?;

        let date = match date_token {
            Some(token) => parse_table_date(token, today)?,
            None => self.last_date.unwrap_or(today),
        };

        self.last_date = Some(date);
        Some(date.and_time(time))
    }

    /// Fold a whole column of cells, threading the carried date through.
    pub fn resolve_all<'a, I>(cells: I, today: NaiveDate) -> Vec<Option<NaiveDateTime>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut clock = HeadlineClock::new();
        cells
            .into_iter()
            .map(|cell| clock.advance(cell, today))
            .collect()
    }
}

fn parse_table_date(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    if token.eq_ignore_ascii_case("today") {
        return Some(today);
    }

    match token.matches('-').count() {
        2 => NaiveDate::parse_from_str(token, "%b-%d-%y").ok(),
        // Month-day only: assume the current year
        1 => NaiveDate::parse_from_str(&format!("{}-{}", token, today.year()), "%b-%d-%Y").ok(),
        _ => None,
    }
}
