use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::INGEST;

/// Monotonic clock used by `trace_time!`.
pub type AppInstant = std::time::Instant;

/// Parses a candle date label into a naive timestamp.
///
/// Tries RFC 3339 first, then each of the configured ingest formats, then a bare
/// `YYYY-MM-DD` date (midnight). Returns `None` if nothing matches.
pub fn parse_date_label(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt.naive_utc());
    }

    INGEST
        .date_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(label, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(label, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
