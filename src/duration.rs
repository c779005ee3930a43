// src/duration.rs
// Timestamp parsing, duration formatting and per-label aggregation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Rendered in place of a duration whose timestamps can't be parsed
pub const UNKNOWN_DURATION: &str = "?";

/// Layouts carrying a numeric offset (`+HHMM` or `+HH:MM`)
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Wall-clock layouts accepted when no offset is present
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp missing")]
    Missing,
    #[error("unparseable timestamp: {0}")]
    Invalid(String),
}

/// Parse an API timestamp into a UTC wall-clock value.
///
/// Date and time may be split by `T` or a space, seconds and fractional
/// seconds are optional, and the suffix may be `Z`, `+HH:MM` or `+HHMM`.
/// Offsets are folded into UTC, fractional seconds are dropped, and values
/// without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Missing);
    }

    let normalized = normalize_separator(raw);
    let text = normalized.strip_suffix(['Z', 'z']).unwrap_or(&normalized);

    let parsed = DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|layout| DateTime::parse_from_str(text, layout).ok())
        })
        .map(|dt| dt.naive_utc())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        })
        .ok_or_else(|| TimestampError::Invalid(raw.to_string()))?;

    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}

/// `2024-01-01 10:00` reads the same as `2024-01-01T10:00`
fn normalize_separator(raw: &str) -> String {
    match raw.split_once(' ') {
        Some((date, time)) => format!("{}T{}", date, time.trim_start()),
        None => raw.to_string(),
    }
}

/// Whole seconds between two timestamps (negative if `stop` precedes `start`)
pub fn span_seconds(start: &str, stop: &str) -> Result<i64, TimestampError> {
    let start = parse_timestamp(start)?;
    let stop = parse_timestamp(stop)?;
    Ok((stop - start).num_seconds())
}

/// Render seconds as `<H>h <M>m`, truncating to whole minutes
pub fn format_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!("{}{}h {}m", sign, secs / 3600, (secs % 3600) / 60)
}

/// Best-effort duration string for display; `?` when either side is bad
pub fn format_duration(start: &str, stop: &str) -> String {
    span_seconds(start, stop)
        .map(format_seconds)
        .unwrap_or_else(|_| UNKNOWN_DURATION.to_string())
}

/// Time elapsed from `start` until now, for a still-running tracking
pub fn elapsed_since(start: &str) -> String {
    elapsed_since_at(start, Utc::now().naive_utc())
}

pub fn elapsed_since_at(start: &str, now: NaiveDateTime) -> String {
    match parse_timestamp(start) {
        Ok(start) => format_seconds((now - start).num_seconds()),
        Err(_) => UNKNOWN_DURATION.to_string(),
    }
}

/// Timestamp layout the API expects in request bodies and range paths
pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000";

/// Current UTC time in API layout, used when the caller omits a timestamp
pub fn api_now() -> String {
    Utc::now().format(API_TIMESTAMP_FORMAT).to_string()
}

/// First instant of a day in API layout
pub fn start_of_day(date: NaiveDate) -> String {
    format!("{}T00:00:00.000", date.format("%Y-%m-%d"))
}

/// Last millisecond of a day in API layout
pub fn end_of_day(date: NaiveDate) -> String {
    format!("{}T23:59:59.999", date.format("%Y-%m-%d"))
}

/// Range start: a bare date widens to the start of that day, anything with
/// a time part is passed through verbatim
pub fn range_start(raw: &str) -> String {
    if raw.contains('T') {
        raw.to_string()
    } else {
        format!("{}T00:00:00.000", raw)
    }
}

/// Range end: a bare date widens to the end of that day
pub fn range_end(raw: &str) -> String {
    if raw.contains('T') {
        raw.to_string()
    } else {
        format!("{}T23:59:59.999", raw)
    }
}

/// Per-label duration totals for one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationTotals {
    pub by_label: HashMap<String, i64>,
    pub total: i64,
    /// Entries that contributed to the totals
    pub counted: usize,
    /// Entries dropped because their timestamps didn't parse
    pub skipped: usize,
}

impl DurationTotals {
    /// Labels ordered by descending total; ties broken alphabetically
    pub fn sorted(&self) -> Vec<(&str, i64)> {
        let mut rows: Vec<(&str, i64)> = self
            .by_label
            .iter()
            .map(|(label, secs)| (label.as_str(), *secs))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    /// Share of the grand total in percent; 0 when nothing was tracked
    pub fn percentage(&self, secs: i64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            secs as f64 / self.total as f64 * 100.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Sum durations by label. Entries whose duration fails are skipped so a
/// single malformed entry never aborts the report.
pub fn aggregate_by_label<T, L, D>(entries: &[T], label_fn: L, duration_fn: D) -> DurationTotals
where
    L: Fn(&T) -> String,
    D: Fn(&T) -> Result<i64, TimestampError>,
{
    let mut totals = DurationTotals::default();

    for entry in entries {
        match duration_fn(entry) {
            Ok(secs) => {
                *totals.by_label.entry(label_fn(entry)).or_insert(0) += secs;
                totals.total += secs;
                totals.counted += 1;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping entry with unusable duration");
                totals.skipped += 1;
            }
        }
    }

    totals
}
