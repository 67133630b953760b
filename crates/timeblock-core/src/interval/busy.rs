//! Busy interval extraction from existing calendar events.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::TimeInterval;
use crate::time::parse_timestamp;

/// Calendar event for conflict detection.
///
/// Timestamps stay as the strings the calendar source delivered; they are
/// parsed in the user's zone when busy intervals are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start: String,
    pub end: String,
}

impl CalendarEvent {
    /// Create a new calendar event
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: None,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Attach the provider's event id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse into an interval, or `None` if either bound is unusable.
    pub fn to_interval(&self, tz: &Tz) -> Option<TimeInterval> {
        let start = parse_timestamp(&self.start, tz)?;
        let end = parse_timestamp(&self.end, tz)?;
        TimeInterval::new(start, end)
    }
}

/// Build busy intervals sorted by start.
///
/// Best effort: events whose start or end fails to parse, or that end before
/// they start, are dropped without error.
pub fn build_busy_intervals(events: &[CalendarEvent], tz: &Tz) -> Vec<TimeInterval> {
    let mut busy: Vec<TimeInterval> = events
        .iter()
        .filter_map(|event| {
            let interval = event.to_interval(tz);
            if interval.is_none() {
                tracing::debug!(
                    id = event.id.as_deref().unwrap_or("-"),
                    start = %event.start,
                    end = %event.end,
                    "dropping calendar event with unusable timestamps"
                );
            }
            interval
        })
        .collect();

    busy.sort_by_key(|interval| interval.start);
    busy
}
