//! User preferences: time zone and daily wake/sleep bounds.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::interval::TimeInterval;
use crate::time::{parse_clock, parse_time_zone, resolve_local};

/// Wake/sleep override for a single weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub wake_time: String, // HH:mm
    pub sleep_time: String, // HH:mm
}

/// Scheduling preferences supplied by the preferences store.
///
/// `daily_schedule` keys accept `mon` or `monday` in any case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub time_zone: String,
    pub wake_time: String, // HH:mm
    pub sleep_time: String, // HH:mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_schedule: Option<HashMap<Weekday, DaySchedule>>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            wake_time: "08:00".to_string(),
            sleep_time: "23:00".to_string(),
            daily_schedule: None,
        }
    }
}

impl UserPreferences {
    /// Create preferences with no per-day overrides.
    pub fn new(
        time_zone: impl Into<String>,
        wake_time: impl Into<String>,
        sleep_time: impl Into<String>,
    ) -> Self {
        Self {
            time_zone: time_zone.into(),
            wake_time: wake_time.into(),
            sleep_time: sleep_time.into(),
            daily_schedule: None,
        }
    }

    /// Add a per-weekday override.
    pub fn with_day(mut self, weekday: Weekday, wake_time: &str, sleep_time: &str) -> Self {
        self.daily_schedule.get_or_insert_with(HashMap::new).insert(
            weekday,
            DaySchedule {
                wake_time: wake_time.to_string(),
                sleep_time: sleep_time.to_string(),
            },
        );
        self
    }

    /// Parsed time zone.
    pub fn tz(&self) -> Result<Tz, ValidationError> {
        parse_time_zone(&self.time_zone)
    }

    /// Raw wake/sleep strings for a weekday, override first.
    pub fn bounds_for(&self, weekday: Weekday) -> (&str, &str) {
        match self.daily_schedule.as_ref().and_then(|days| days.get(&weekday)) {
            Some(day) => (&day.wake_time, &day.sleep_time),
            None => (&self.wake_time, &self.sleep_time),
        }
    }

    /// The wake/sleep window of a local date as UTC instants.
    ///
    /// Returns `None` when either bound fails to parse or when
    /// `sleep <= wake`; such a day has no window at all (no wrap past midnight).
    pub fn day_window(&self, tz: &Tz, date: NaiveDate) -> Option<TimeInterval> {
        let (wake_raw, sleep_raw) = self.bounds_for(date.weekday());
        let (Some(wake), Some(sleep)) = (parse_clock(wake_raw), parse_clock(sleep_raw)) else {
            tracing::debug!(
                %date,
                wake = wake_raw,
                sleep = sleep_raw,
                "unparseable wake/sleep bounds; skipping day"
            );
            return None;
        };

        if sleep <= wake {
            tracing::debug!(%date, %wake, %sleep, "sleep is not after wake; day has no window");
            return None;
        }

        let start = resolve_local(tz, date.and_time(wake));
        let end = resolve_local(tz, date.and_time(sleep));
        TimeInterval::new(start, end)
    }
}
