//! Canonical timestamp strings
//!
//! Timestamps are stored and serialized as RFC 3339 UTC strings with
//! millisecond precision, so lexical order equals chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a timestamp in canonical form
pub fn format(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in canonical form
pub fn now() -> String {
    format(Utc::now())
}

/// Parse a canonical (or any RFC 3339) timestamp
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date and return the
/// canonical form
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(dt) = parse(raw) {
        return Some(format(dt));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(format(date.and_hms_opt(0, 0, 0)?.and_utc()))
}
