//! Habit suggestion engine.
//!
//! Proposes blocks for recurring habits:
//! - Recurrence eligibility (daily, weekly on chosen days, custom)
//! - Preferred time-of-day windows with fallback to the whole day
//! - Proposals consume pool capacity so nothing double-books within a call
//!
//! Habits are processed in input order. When two habits want the same
//! window, the one listed first gets it.

mod suggest;

pub use suggest::{suggest_habit_blocks, suggest_into};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scheduler::ScheduledBlock;

/// How often a habit recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    /// Only on the habit's `days_of_week`
    Weekly,
    /// Treated like daily
    Custom,
}

/// Coarse preferred placement within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

/// Local hour ranges `[start, end)` for each [`TimeOfDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayWindows {
    #[serde(default = "default_morning")]
    pub morning: [u32; 2],
    #[serde(default = "default_afternoon")]
    pub afternoon: [u32; 2],
    #[serde(default = "default_evening")]
    pub evening: [u32; 2],
}

fn default_morning() -> [u32; 2] {
    [5, 12]
}
fn default_afternoon() -> [u32; 2] {
    [12, 17]
}
fn default_evening() -> [u32; 2] {
    [17, 22]
}

impl Default for TimeOfDayWindows {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            afternoon: default_afternoon(),
            evening: default_evening(),
        }
    }
}

impl TimeOfDayWindows {
    /// Hour range for a time of day.
    pub fn hours(&self, time_of_day: TimeOfDay) -> [u32; 2] {
        match time_of_day {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
        }
    }

    /// Local wall-clock bounds of the window on `date`. Hour 24 is next midnight.
    pub(crate) fn local_bounds(
        &self,
        time_of_day: TimeOfDay,
        date: NaiveDate,
    ) -> (chrono::NaiveDateTime, chrono::NaiveDateTime) {
        let [start, end] = self.hours(time_of_day);
        let midnight = date.and_time(NaiveTime::MIN);
        (
            midnight + Duration::hours(i64::from(start.min(24))),
            midnight + Duration::hours(i64::from(end.min(24))),
        )
    }
}

/// A recurring habit to find room for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInput {
    pub id: String,
    pub duration_minutes: i64,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<Weekday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_of_day: Option<TimeOfDay>,
}

impl HabitInput {
    /// Create a daily habit with no preferred time
    pub fn daily(id: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            id: id.into(),
            duration_minutes,
            frequency: Frequency::Daily,
            days_of_week: None,
            preferred_time_of_day: None,
        }
    }

    /// Create a weekly habit on the given days
    pub fn weekly(id: impl Into<String>, duration_minutes: i64, days: &[Weekday]) -> Self {
        Self {
            frequency: Frequency::Weekly,
            days_of_week: Some(days.to_vec()),
            ..Self::daily(id, duration_minutes)
        }
    }

    pub fn preferring(mut self, time_of_day: TimeOfDay) -> Self {
        self.preferred_time_of_day = Some(time_of_day);
        self
    }

    /// `None` when the minutes exceed what a `Duration` can hold.
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.duration_minutes)
    }

    /// Whether the habit recurs on a day with this weekday.
    pub fn is_due_on(&self, weekday: Weekday) -> bool {
        match self.frequency {
            Frequency::Daily | Frequency::Custom => true,
            Frequency::Weekly => self
                .days_of_week
                .as_ref()
                .is_some_and(|days| days.contains(&weekday)),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                id: self.id.clone(),
                minutes: self.duration_minutes,
            });
        }
        Ok(())
    }
}

/// Lifecycle state of a suggestion. The engine only ever proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Proposed,
}

/// Why a suggestion landed where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementReason {
    #[serde(rename = "Preferred time")]
    PreferredTime,
    #[serde(rename = "Placed outside preferred window")]
    OutsidePreferredWindow,
}

impl PlacementReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreferredTime => "Preferred time",
            Self::OutsidePreferredWindow => "Placed outside preferred window",
        }
    }
}

/// A proposed habit block. Never committed until the caller accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSuggestionBlock {
    pub habit_id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub status: SuggestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<PlacementReason>,
}

impl HabitSuggestionBlock {
    /// Promote the proposal to a committed block keyed by the habit id.
    pub fn accept(&self) -> ScheduledBlock {
        ScheduledBlock {
            task_id: self.habit_id.clone(),
            start: self.start,
            end: self.end,
            overflowed_deadline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility() {
        let daily = HabitInput::daily("stretch", 15);
        assert!(daily.is_due_on(Weekday::Sun));

        let custom = HabitInput {
            frequency: Frequency::Custom,
            ..HabitInput::daily("read", 30)
        };
        assert!(custom.is_due_on(Weekday::Wed));

        let weekly = HabitInput::weekly("gym", 60, &[Weekday::Mon, Weekday::Thu]);
        assert!(weekly.is_due_on(Weekday::Mon));
        assert!(!weekly.is_due_on(Weekday::Tue));

        let weekly_without_days = HabitInput {
            days_of_week: None,
            ..weekly
        };
        assert!(!weekly_without_days.is_due_on(Weekday::Mon));
    }

    #[test]
    fn test_habit_json_shape() {
        let habit: HabitInput = serde_json::from_str(
            r#"{
                "id": "gym",
                "durationMinutes": 60,
                "frequency": "weekly",
                "daysOfWeek": ["mon", "wed"],
                "preferredTimeOfDay": "evening"
            }"#,
        )
        .unwrap();
        assert_eq!(habit.frequency, Frequency::Weekly);
        assert_eq!(habit.days_of_week, Some(vec![Weekday::Mon, Weekday::Wed]));
        assert_eq!(habit.preferred_time_of_day, Some(TimeOfDay::Evening));
    }

    #[test]
    fn test_validate_duration() {
        assert!(HabitInput::daily("ok", 1).validate().is_ok());
        assert_eq!(
            HabitInput::daily("zero", 0).validate(),
            Err(ValidationError::NonPositiveDuration {
                id: "zero".to_string(),
                minutes: 0
            })
        );
    }

    #[test]
    fn test_reason_serializes_as_text() {
        let json = serde_json::to_string(&PlacementReason::OutsidePreferredWindow).unwrap();
        assert_eq!(json, format!("\"{}\"", PlacementReason::OutsidePreferredWindow.as_str()));
    }

    #[test]
    fn test_default_windows() {
        let windows = TimeOfDayWindows::default();
        assert_eq!(windows.hours(TimeOfDay::Morning), [5, 12]);
        assert_eq!(windows.hours(TimeOfDay::Afternoon), [12, 17]);
        assert_eq!(windows.hours(TimeOfDay::Evening), [17, 22]);

        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let late = TimeOfDayWindows {
            evening: [20, 24],
            ..windows
        };
        let (_, end) = late.local_bounds(TimeOfDay::Evening, date);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 2).unwrap().and_time(NaiveTime::MIN));
    }
}
