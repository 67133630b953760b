//! One invocation's worth of scheduling state.
//!
//! A [`Planner`] owns the slot pool for a single snapshot of events and
//! preferences. Tasks and habits scheduled through the same planner share
//! that pool, so their combined output never overlaps.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::habits::{HabitInput, HabitSuggestionBlock, TimeOfDayWindows};
use crate::interval::{CalendarEvent, SlotPool};
use crate::preferences::UserPreferences;
use crate::scheduler::{ScheduledBlock, TaskInput};
use crate::time::parse_range_bound;

/// Combined result of scheduling tasks and suggesting habits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub blocks: Vec<ScheduledBlock>,
    pub suggestions: Vec<HabitSuggestionBlock>,
    /// Tasks that did not fit anywhere in the range, in input order
    pub unscheduled_task_ids: Vec<String>,
}

/// Scheduling state for one snapshot of inputs.
#[derive(Debug, Clone)]
pub struct Planner {
    preferences: UserPreferences,
    tz: Tz,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    windows: TimeOfDayWindows,
    pool: SlotPool,
}

impl Planner {
    /// Build the pool from events and preferences over `[range_start, range_end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeZone` for an unknown zone and `InvalidRange` when a
    /// boundary does not parse in that zone.
    pub fn new(
        existing_events: &[CalendarEvent],
        preferences: &UserPreferences,
        range_start: &str,
        range_end: &str,
    ) -> Result<Self> {
        let tz = preferences.tz()?;
        let start = parse_range_bound("rangeStart", range_start, &tz)?;
        let end = parse_range_bound("rangeEnd", range_end, &tz)?;
        let pool = SlotPool::build(start, end, preferences, &tz, existing_events);

        Ok(Self {
            preferences: preferences.clone(),
            tz,
            range_start: start,
            range_end: end,
            windows: TimeOfDayWindows::default(),
            pool,
        })
    }

    /// Use custom time-of-day hour ranges for habit preferences.
    pub fn with_time_of_day(mut self, windows: TimeOfDayWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Remaining free capacity.
    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Schedule tasks into the remaining capacity.
    pub fn schedule_tasks(&mut self, tasks: &[TaskInput]) -> Result<Vec<ScheduledBlock>> {
        Ok(crate::scheduler::schedule_into(&mut self.pool, tasks, &self.tz)?)
    }

    /// Suggest habit blocks from the remaining capacity.
    pub fn suggest_habits(&mut self, habits: &[HabitInput]) -> Result<Vec<HabitSuggestionBlock>> {
        Ok(crate::habits::suggest_into(
            &mut self.pool,
            habits,
            &self.preferences,
            &self.tz,
            (self.range_start, self.range_end),
            &self.windows,
        )?)
    }

    /// Tasks first, then habits, on one pool.
    ///
    /// Inputs are validated before anything is placed.
    pub fn plan(mut self, tasks: &[TaskInput], habits: &[HabitInput]) -> Result<Plan> {
        tasks.iter().try_for_each(TaskInput::validate)?;
        habits.iter().try_for_each(HabitInput::validate)?;

        let blocks = self.schedule_tasks(tasks)?;
        let suggestions = self.suggest_habits(habits)?;
        let unscheduled_task_ids = tasks
            .iter()
            .filter(|task| !blocks.iter().any(|block| block.task_id == task.id))
            .map(|task| task.id.clone())
            .collect();

        Ok(Plan {
            blocks,
            suggestions,
            unscheduled_task_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn prefs() -> UserPreferences {
        UserPreferences::new("UTC", "08:00", "12:00")
    }

    fn morning_planner() -> Planner {
        Planner::new(&[], &prefs(), "2025-12-01T08:00", "2025-12-01T12:00").unwrap()
    }

    #[test]
    fn test_rejects_bad_range() {
        let err = Planner::new(&[], &prefs(), "yesterday", "2025-12-01T12:00").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::InvalidRange { field: "rangeStart", .. })
        ));

        let err = Planner::new(&[], &prefs(), "2025-12-01T08:00", "").unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::InvalidRange { field: "rangeEnd", .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_zone() {
        let prefs = UserPreferences::new("Nowhere/Land", "08:00", "12:00");
        let err = Planner::new(&[], &prefs, "2025-12-01T08:00", "2025-12-01T12:00").unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::InvalidTimeZone(_))));
    }

    #[test]
    fn test_tasks_and_habits_share_pool() {
        let mut planner = morning_planner();
        let blocks = planner.schedule_tasks(&[TaskInput::new("report", 180, 1)]).unwrap();
        let habits = planner.suggest_habits(&[HabitInput::daily("walk", 60)]).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].start, blocks[0].end);
        assert!(planner.pool().is_empty());
    }

    #[test]
    fn test_plan_reports_unscheduled() {
        let planner = morning_planner();
        let plan = planner
            .plan(
                &[TaskInput::new("fits", 120, 1), TaskInput::new("too-big", 180, 2)],
                &[HabitInput::daily("walk", 60)],
            )
            .unwrap();

        assert_eq!(plan.blocks.len(), 1);
        assert_eq!(plan.unscheduled_task_ids, vec!["too-big".to_string()]);
        assert_eq!(plan.suggestions.len(), 1);
    }

    #[test]
    fn test_plan_validates_before_placing() {
        let planner = morning_planner();
        let err = planner
            .plan(&[TaskInput::new("fine", 30, 1)], &[HabitInput::daily("bad", 0)])
            .unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn test_accepted_suggestion_becomes_block() {
        let mut planner = morning_planner();
        let mut suggestions = planner.suggest_habits(&[HabitInput::daily("walk", 30)]).unwrap();
        let suggestion = suggestions.remove(0);
        let accepted = suggestion.accept();

        assert_eq!(accepted.task_id, "walk");
        assert_eq!(accepted.start, suggestion.start);
        assert_eq!(accepted.duration_minutes(), 30);
        assert!(!accepted.overflowed_deadline);
    }
}
