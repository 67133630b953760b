//! Free window construction and busy-time subtraction.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::TimeInterval;
use crate::preferences::UserPreferences;
use crate::time::local_days;

/// One wake/sleep window per local day touched by the range, clipped to it.
///
/// Days without a valid window, and days whose clipped window is empty, are
/// left out. Output is chronological.
pub fn build_free_slots(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    preferences: &UserPreferences,
    tz: &Tz,
) -> Vec<TimeInterval> {
    let Some(range) = TimeInterval::new(range_start, range_end) else {
        tracing::debug!(%range_start, %range_end, "empty scheduling range");
        return Vec::new();
    };

    local_days(range_start, range_end, tz)
        .into_iter()
        .filter_map(|date| preferences.day_window(tz, date))
        .filter_map(|window| window.intersect(&range))
        .collect()
}

/// Remove every busy interval from the free slots.
///
/// Busy intervals are applied one at a time since each may split slots
/// further. Overlapping busy intervals are harmless.
pub fn subtract_intervals(free_slots: &[TimeInterval], busy: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut slots = free_slots.to_vec();
    for blocked in busy {
        slots = slots.iter().flat_map(|slot| slot.subtract(blocked)).collect();
        if slots.is_empty() {
            break;
        }
    }
    slots
}
