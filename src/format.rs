//! Relative timestamps for message summaries.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, Local, NaiveDateTime};

/// Render a backend timestamp relative to `now`: "Just now", "5m ago",
/// "3h ago", "2d ago", then `M/D/YYYY` from a week on. Missing or
/// unparseable input renders as an empty string.
#[must_use]
pub fn format_message_time(timestamp: Option<&str>, now: NaiveDateTime) -> String {
    let Some(at) = timestamp.and_then(parse_timestamp) else {
        return String::new();
    };
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_owned()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}

/// [`format_message_time`] against the local wall clock.
#[must_use]
pub fn format_message_time_now(timestamp: Option<&str>) -> String {
    format_message_time(timestamp, Local::now().naive_local())
}

/// Backend `LocalDateTime` (no offset) or RFC 3339, the latter converted to
/// local time.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Local).naive_local()))
}
