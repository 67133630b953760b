//! Interval algebra over absolute time.
//!
//! This module provides:
//! - Busy interval extraction from calendar events
//! - Per-day free windows from wake/sleep preferences
//! - Set difference (free minus busy) and the resulting slot pool

mod busy;
mod free;
mod pool;

pub use busy::{build_busy_intervals, CalendarEvent};
pub use free::{build_free_slots, subtract_intervals};
pub use pool::SlotPool;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of instants with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Create an interval, or `None` if it would be empty or inverted.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Check if a block of the given length fits
    pub fn can_fit(&self, duration: Duration) -> bool {
        self.duration() >= duration
    }

    /// Half-open overlap test; touching intervals do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Common part of two intervals.
    pub fn intersect(&self, other: &TimeInterval) -> Option<TimeInterval> {
        TimeInterval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Pieces of this interval left after removing `other`, in order.
    pub fn subtract(&self, other: &TimeInterval) -> Vec<TimeInterval> {
        if !self.overlaps(other) {
            return vec![*self];
        }

        [
            TimeInterval::new(self.start, other.start),
            TimeInterval::new(other.end, self.end),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
