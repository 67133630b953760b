//! Task scheduler.
//!
//! Places tasks into the free-slot pool:
//! - Orders tasks by due date (undated last), then priority
//! - Puts each task at the start of the first slot large enough for it
//! - Flags blocks that end after their task's due date
//! - Skips tasks that fit nowhere in the range

use std::cmp::Ordering;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::interval::{CalendarEvent, SlotPool};
use crate::planner::Planner;
use crate::preferences::UserPreferences;
use crate::time::{parse_timestamp, to_local_fixed};

/// A task waiting for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub id: String,
    pub duration_minutes: i64,
    /// 1 is most urgent, 3 least
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskInput {
    /// Create a task with no due date
    pub fn new(id: impl Into<String>, duration_minutes: i64, priority: u8) -> Self {
        Self {
            id: id.into(),
            duration_minutes,
            priority,
            due_date: None,
        }
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// `None` when the minutes exceed what a `Duration` can hold.
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.duration_minutes)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                id: self.id.clone(),
                minutes: self.duration_minutes,
            });
        }
        if !(1..=3).contains(&self.priority) {
            return Err(ValidationError::InvalidPriority {
                id: self.id.clone(),
                priority: self.priority,
            });
        }
        Ok(())
    }
}

/// A task placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBlock {
    pub task_id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Set when the block ends after the task's due date
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub overflowed_deadline: bool,
}

impl ScheduledBlock {
    /// Get total duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Schedule tasks over a fresh pool built from the inputs.
///
/// # Errors
///
/// Fails on an unknown time zone, a malformed range boundary, or an invalid
/// task. Running out of room is not an error; the task is left out.
pub fn schedule_tasks(
    tasks: &[TaskInput],
    existing_events: &[CalendarEvent],
    preferences: &UserPreferences,
    range_start: &str,
    range_end: &str,
) -> Result<Vec<ScheduledBlock>> {
    Planner::new(existing_events, preferences, range_start, range_end)?.schedule_tasks(tasks)
}

/// Sort tasks by urgency: due date ascending with undated tasks last,
/// then priority ascending. Equal keys keep their input order.
pub fn sort_by_urgency<'a>(
    tasks: &'a [TaskInput],
    tz: &Tz,
) -> Vec<(&'a TaskInput, Option<DateTime<Utc>>)> {
    let mut keyed: Vec<_> = tasks.iter().map(|task| (task, parse_due(task, tz))).collect();

    keyed.sort_by(|(a, a_due), (b, b_due)| {
        let by_due = match (a_due, b_due) {
            (Some(a_due), Some(b_due)) => a_due.cmp(b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_due.then(a.priority.cmp(&b.priority))
    });
    keyed
}

fn parse_due(task: &TaskInput, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = task.due_date.as_deref()?;
    let due = parse_timestamp(raw, tz);
    if due.is_none() {
        tracing::warn!(
            task = %task.id,
            due_date = raw,
            "unparseable due date; treating task as undated"
        );
    }
    due
}

/// Place tasks into `pool`, reserving each placement.
pub fn schedule_into(
    pool: &mut SlotPool,
    tasks: &[TaskInput],
    tz: &Tz,
) -> Result<Vec<ScheduledBlock>, ValidationError> {
    tasks.iter().try_for_each(TaskInput::validate)?;

    let mut scheduled = Vec::with_capacity(tasks.len());

    for (task, due) in sort_by_urgency(tasks, tz) {
        let Some(block) = task.duration().and_then(|duration| pool.first_fit(duration)) else {
            tracing::warn!(
                task = %task.id,
                minutes = task.duration_minutes,
                "no free slot fits task; skipping"
            );
            continue;
        };

        let reserved = pool.reserve(&block);
        debug_assert!(reserved, "first-fit block must lie inside a pool slot");
        let overflowed_deadline = due.is_some_and(|due| block.end > due);
        tracing::debug!(task = %task.id, start = %block.start, overflowed_deadline, "task placed");

        scheduled.push(ScheduledBlock {
            task_id: task.id.clone(),
            start: to_local_fixed(block.start, tz),
            end: to_local_fixed(block.end, tz),
            overflowed_deadline,
        });
    }

    tracing::info!(
        requested = tasks.len(),
        scheduled = scheduled.len(),
        "task scheduling pass complete"
    );
    Ok(scheduled)
}
