//! Timestamp parsing and local-day resolution.
//!
//! Everything crossing the library boundary is an ISO-8601 string interpreted
//! in an IANA zone. Inside the engine all arithmetic happens on UTC instants.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::ValidationError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA zone name such as `Europe/Berlin`.
pub fn parse_time_zone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::InvalidTimeZone(name.to_string()))
}

/// Parse a timestamp in `tz`.
///
/// Strings with an explicit offset are taken as-is; naive strings are local
/// wall-clock time in `tz`, and a bare date means local midnight.
pub fn parse_timestamp(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(resolve_local(tz, naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| resolve_local(tz, date.and_time(NaiveTime::MIN)))
}

/// Parse a range boundary, failing with `InvalidRange` when it is malformed.
pub fn parse_range_bound(
    field: &'static str,
    value: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, ValidationError> {
    parse_timestamp(value, tz).ok_or_else(|| ValidationError::InvalidRange {
        field,
        value: value.to_string(),
    })
}

/// Parse a `HH:mm` wall-clock time.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times (fall-back) take the earlier instant. Times inside a
/// spring-forward gap are shifted past the transition.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }

    let shifted = naive + Duration::hours(1);
    if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
        tracing::debug!(
            %naive,
            zone = %tz,
            "local time falls in a DST gap; shifting past transition"
        );
        return dt.with_timezone(&Utc);
    }

    tracing::warn!(%naive, zone = %tz, "could not resolve local time; interpreting as UTC");
    Utc.from_utc_datetime(&naive)
}

/// Local calendar dates touched by `[start, end]`, in order.
pub fn local_days(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }

    let first = start.with_timezone(tz).date_naive();
    let last = end.with_timezone(tz).date_naive();
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// Convert an instant into the user's zone as a fixed-offset timestamp.
pub fn to_local_fixed(instant: DateTime<Utc>, tz: &Tz) -> DateTime<FixedOffset> {
    let local = instant.with_timezone(tz);
    local.with_timezone(&local.offset().fix())
}
