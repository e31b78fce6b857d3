//! Timestamp parsing and duration formatting

use crate::dataset::{parse_float_prefix, CellValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use opmode_core::Segment;

/// Epoch values below this are seconds, at or above it milliseconds
const SECONDS_CUTOFF: f64 = 1e10;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let ms = if value < SECONDS_CUTOFF { value * 1000.0 } else { value };
    Utc.timestamp_millis_opt(ms.trunc() as i64).single()
}

fn from_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }

    parse_float_prefix(text).and_then(from_epoch)
}

/// Interpret a cell as a point in time
///
/// Numbers are Unix epoch values: seconds below 1e10, milliseconds
/// otherwise. Text is tried as RFC 3339, then as a date/time without offset
/// (read as UTC), then as an epoch number.
///
/// # Examples
///
/// ```rust
/// use opmode_pipeline::{parse_timestamp, CellValue};
///
/// let a = parse_timestamp(&CellValue::Number(1_700_000_000.0)).unwrap();
/// let b = parse_timestamp(&CellValue::Number(1_700_000_000_000.0)).unwrap();
/// assert_eq!(a, b);
/// assert!(parse_timestamp(&CellValue::from("yesterday")).is_none());
/// ```
pub fn parse_timestamp(cell: &CellValue) -> Option<DateTime<Utc>> {
    match cell {
        CellValue::Number(x) => from_epoch(*x),
        CellValue::Text(s) => from_text(s),
        CellValue::Bool(_) | CellValue::Missing => None,
    }
}

/// Milliseconds from `start` to `end`, when both are known
pub fn duration_ms(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<i64> {
    Some((end? - start?).num_milliseconds())
}

/// Elapsed time between the first and last sample of a segment
pub fn segment_duration_ms(timestamps: &[Option<DateTime<Utc>>], segment: Segment) -> Option<i64> {
    if !segment.fits(timestamps.len()) {
        return None;
    }
    duration_ms(timestamps[segment.start], timestamps[segment.end])
}

/// Human-readable duration
///
/// `"45m"` under an hour, `"2h 30m"` under a day, `"1d 5h 20m"` beyond.
/// Zero-valued trailing units are left out; non-positive input is `"0m"`.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return "0m".to_string();
    }

    let days = ms / MS_PER_DAY;
    let hours = (ms / MS_PER_HOUR) % 24;
    let minutes = (ms / MS_PER_MINUTE) % 60;

    if days >= 1 {
        let mut parts = vec![format!("{days}d")];
        if hours > 0 {
            parts.push(format!("{hours}h"));
        }
        if minutes > 0 {
            parts.push(format!("{minutes}m"));
        }
        parts.join(" ")
    } else if ms >= MS_PER_HOUR {
        if minutes > 0 {
            format!("{}h {minutes}m", ms / MS_PER_HOUR)
        } else {
            format!("{}h", ms / MS_PER_HOUR)
        }
    } else {
        format!("{}m", ms / MS_PER_MINUTE)
    }
}

/// Single-unit duration with one decimal: `"1.5d"`, `"2.0h"`, `"45m"`
///
/// Non-positive input is `"0m"`.
pub fn format_duration_compact(ms: i64) -> String {
    if ms <= 0 {
        return "0m".to_string();
    }
    let ms = ms as f64;
    let days = ms / MS_PER_DAY as f64;
    let hours = ms / MS_PER_HOUR as f64;

    if days >= 1.0 {
        format!("{days:.1}d")
    } else if hours >= 1.0 {
        format!("{hours:.1}h")
    } else {
        format!("{}m", (ms / MS_PER_MINUTE as f64).round())
    }
}
