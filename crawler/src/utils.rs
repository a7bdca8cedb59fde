use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref DURATION_RE: Regex = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parse an ISO8601 timestamp as published by the Data API ("2024-01-15T10:00:00Z").
/// Timestamps without an offset are read as UTC.
pub fn parse_iso8601_timestamp(date_str: &str) -> Option<DateTime<FixedOffset>> {
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt);
    }

    NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Render a publish timestamp as "Jan 15, 2024". Unparseable input is returned as is.
pub fn format_date(date_str: &str) -> String {
    match parse_iso8601_timestamp(date_str) {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => date_str.to_string(),
    }
}

/// Format ISO8601 duration string (PT1H2M3S) as "1h 2m 3s"
pub fn format_duration(duration: &str) -> String {
    if duration.is_empty() || duration == "PT0S" {
        return "Unknown".to_string();
    }

    let Some(captures) = DURATION_RE.captures(duration) else {
        return duration.to_string();
    };

    let mut parts = Vec::new();
    for (index, unit) in ["h", "m", "s"].iter().enumerate() {
        let value = captures
            .get(index + 1)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0);
        if value > 0 {
            parts.push(format!("{value}{unit}"));
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

// Formats each x1000 step
pub fn format_number(number: u64) -> String {
    let num_str = number.to_string();
    let mut result = String::new();
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// RFC 3339 with a `Z` suffix and whole seconds, the form the search endpoint expects.
pub fn to_api_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn compare_with_order_float(a: f64, b: f64, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        SortOrder::Desc => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Split a comma-separated value, trimming entries and dropping blanks.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
