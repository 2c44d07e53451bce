//! Publish timestamp formatting

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parse a feed timestamp. Naive values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Render `raw` as `YYYY-MM-DD HH:MM TZ` in `tz`, or return it trimmed when it
/// is not a recognised timestamp.
#[must_use]
pub fn format_published(raw: &str, tz: Tz) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => raw.trim().to_string(),
    }
}
