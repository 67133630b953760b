use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use super::{HabitInput, HabitSuggestionBlock, PlacementReason, SuggestionStatus, TimeOfDayWindows};
use crate::error::{Result, ValidationError};
use crate::interval::{CalendarEvent, SlotPool, TimeInterval};
use crate::planner::Planner;
use crate::preferences::UserPreferences;
use crate::time::{local_days, resolve_local, to_local_fixed};

/// Propose habit blocks over a fresh pool built from the inputs.
///
/// # Errors
///
/// Fails on an unknown time zone, a malformed range boundary, or a habit
/// with a non-positive duration. Days with no room are skipped, not errors.
pub fn suggest_habit_blocks(
    habits: &[HabitInput],
    existing_events: &[CalendarEvent],
    preferences: &UserPreferences,
    range_start: &str,
    range_end: &str,
) -> Result<Vec<HabitSuggestionBlock>> {
    Planner::new(existing_events, preferences, range_start, range_end)?.suggest_habits(habits)
}

/// Propose habit blocks, reserving each one from `pool`.
pub fn suggest_into(
    pool: &mut SlotPool,
    habits: &[HabitInput],
    preferences: &UserPreferences,
    tz: &Tz,
    range: (DateTime<Utc>, DateTime<Utc>),
    windows: &TimeOfDayWindows,
) -> Result<Vec<HabitSuggestionBlock>, ValidationError> {
    habits.iter().try_for_each(HabitInput::validate)?;

    let days = local_days(range.0, range.1, tz);
    let mut suggestions = Vec::new();

    for habit in habits {
        let Some(duration) = habit.duration() else {
            tracing::warn!(
                habit = %habit.id,
                minutes = habit.duration_minutes,
                "habit duration exceeds any free slot; skipping"
            );
            continue;
        };
        let before = suggestions.len();

        for &date in &days {
            if !habit.is_due_on(date.weekday()) {
                continue;
            }

            let Some(day) = preferences.day_window(tz, date) else {
                continue;
            };

            let placement = match habit.preferred_time_of_day {
                Some(time_of_day) => {
                    let (local_start, local_end) = windows.local_bounds(time_of_day, date);
                    let preferred = TimeInterval::new(
                        resolve_local(tz, local_start),
                        resolve_local(tz, local_end),
                    )
                    .and_then(|window| window.intersect(&day))
                    .and_then(|window| pool.first_fit_within(&window, duration));

                    match preferred {
                        Some(block) => Some((block, Some(PlacementReason::PreferredTime))),
                        None => pool
                            .first_fit_within(&day, duration)
                            .map(|block| (block, Some(PlacementReason::OutsidePreferredWindow))),
                    }
                }
                None => pool.first_fit_within(&day, duration).map(|block| (block, None)),
            };

            let Some((block, reason)) = placement else {
                tracing::debug!(habit = %habit.id, %date, "no room for habit on this day");
                continue;
            };

            let reserved = pool.reserve(&block);
            debug_assert!(reserved, "first-fit block must lie inside a pool slot");
            suggestions.push(HabitSuggestionBlock {
                habit_id: habit.id.clone(),
                start: to_local_fixed(block.start, tz),
                end: to_local_fixed(block.end, tz),
                status: SuggestionStatus::Proposed,
                reason,
            });
        }

        tracing::debug!(
            habit = %habit.id,
            proposed = suggestions.len() - before,
            "habit suggestions generated"
        );
    }

    tracing::info!(
        habits = habits.len(),
        proposed = suggestions.len(),
        "habit suggestion pass complete"
    );
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::TimeOfDay;
    use chrono::Weekday;

    fn prefs() -> UserPreferences {
        UserPreferences::new("UTC", "07:00", "22:00")
    }

    fn run(
        habits: &[HabitInput],
        events: &[CalendarEvent],
        start: &str,
        end: &str,
    ) -> Vec<HabitSuggestionBlock> {
        suggest_habit_blocks(habits, events, &prefs(), start, end).unwrap()
    }

    fn hm(dt: &chrono::DateTime<chrono::FixedOffset>) -> String {
        dt.format("%Y-%m-%dT%H:%M").to_string()
    }

    #[test]
    fn test_empty_habits() {
        assert!(run(&[], &[], "2025-12-01T00:00", "2025-12-07T23:59").is_empty());
    }

    #[test]
    fn test_daily_habit_every_day() {
        let habits = vec![HabitInput::daily("journal", 15)];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-03T23:59");

        assert_eq!(blocks.len(), 3);
        assert_eq!(hm(&blocks[0].start), "2025-12-01T07:00");
        assert_eq!(hm(&blocks[2].end), "2025-12-03T07:15");
        assert!(blocks
            .iter()
            .all(|b| b.status == SuggestionStatus::Proposed && b.reason.is_none()));
    }

    #[test]
    fn test_weekly_only_on_listed_days() {
        // 2025-12-01 is a Monday
        let habits = vec![HabitInput::weekly("gym", 60, &[Weekday::Mon, Weekday::Wed])];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-07T23:59");

        let days: Vec<_> = blocks.iter().map(|b| b.start.weekday()).collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Wed]);
    }

    #[test]
    fn test_preferred_window_used() {
        let habits = vec![HabitInput::daily("run", 30).preferring(TimeOfDay::Evening)];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-01T23:59");

        assert_eq!(blocks.len(), 1);
        assert_eq!(hm(&blocks[0].start), "2025-12-01T17:00");
        assert_eq!(blocks[0].reason, Some(PlacementReason::PreferredTime));
    }

    #[test]
    fn test_morning_clipped_to_wake() {
        let habits = vec![HabitInput::daily("meditate", 20).preferring(TimeOfDay::Morning)];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-01T23:59");
        assert_eq!(hm(&blocks[0].start), "2025-12-01T07:00");
    }

    #[test]
    fn test_fallback_outside_preferred_window() {
        let events = vec![CalendarEvent::new("2025-12-01T17:00", "2025-12-01T22:00")];
        let habits = vec![HabitInput::daily("run", 30).preferring(TimeOfDay::Evening)];
        let blocks = run(&habits, &events, "2025-12-01T00:00", "2025-12-01T23:59");

        assert_eq!(blocks.len(), 1);
        assert_eq!(hm(&blocks[0].start), "2025-12-01T07:00");
        assert_eq!(blocks[0].reason, Some(PlacementReason::OutsidePreferredWindow));
    }

    #[test]
    fn test_first_listed_habit_wins_contention() {
        // Only 17:00-17:45 free in the evening
        let events = vec![
            CalendarEvent::new("2025-12-01T07:00", "2025-12-01T17:00"),
            CalendarEvent::new("2025-12-01T17:45", "2025-12-01T22:00"),
        ];
        let habits = vec![
            HabitInput::daily("first", 30).preferring(TimeOfDay::Evening),
            HabitInput::daily("second", 30).preferring(TimeOfDay::Evening),
        ];
        let blocks = run(&habits, &events, "2025-12-01T00:00", "2025-12-01T23:59");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].habit_id, "first");
        assert_eq!(hm(&blocks[0].start), "2025-12-01T17:00");
    }

    #[test]
    fn test_habits_do_not_collide() {
        let habits = vec![
            HabitInput::daily("a", 45).preferring(TimeOfDay::Afternoon),
            HabitInput::daily("b", 45).preferring(TimeOfDay::Afternoon),
        ];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-01T23:59");

        assert_eq!(blocks.len(), 2);
        assert_eq!(hm(&blocks[0].start), "2025-12-01T12:00");
        assert_eq!(hm(&blocks[1].start), "2025-12-01T12:45");
        assert!(blocks[0].end <= blocks[1].start);
    }

    #[test]
    fn test_full_day_skipped_silently() {
        let events = vec![CalendarEvent::new("2025-12-01T07:00", "2025-12-01T22:00")];
        let habits = vec![HabitInput::daily("journal", 15)];
        let blocks = run(&habits, &events, "2025-12-01T00:00", "2025-12-02T23:59");

        assert_eq!(blocks.len(), 1);
        assert_eq!(hm(&blocks[0].start), "2025-12-02T07:00");
    }

    #[test]
    fn test_oversized_duration_skipped() {
        let habits = vec![
            HabitInput::daily("huge", 1_000_000_000_000_000).preferring(TimeOfDay::Morning),
            HabitInput::daily("stretch", 20),
        ];
        let blocks = run(&habits, &[], "2025-12-01T00:00", "2025-12-01T23:59");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].habit_id, "stretch");
        assert_eq!(hm(&blocks[0].start), "2025-12-01T07:00");
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let habits = vec![HabitInput::daily("ok", 10), HabitInput::daily("broken", -5)];
        let (start, end) = ("2025-12-01T00:00", "2025-12-01T23:59");
        let err = suggest_habit_blocks(&habits, &[], &prefs(), start, end).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::NonPositiveDuration { id, .. }) if id == "broken"
        ));
    }
}
