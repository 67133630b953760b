//! The capacity pool consumed by the scheduler and habit engine.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use super::{
    build_busy_intervals, build_free_slots, subtract_intervals, CalendarEvent, TimeInterval,
};
use crate::preferences::UserPreferences;

/// Sorted, non-overlapping free slots that shrink as blocks are reserved.
///
/// A pool lives for one engine invocation. Reservations are permanent for
/// that invocation, so whoever reserves first wins the time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPool {
    slots: Vec<TimeInterval>,
}

impl SlotPool {
    /// Wrap an already sorted, non-overlapping slot list.
    pub fn from_slots(slots: Vec<TimeInterval>) -> Self {
        debug_assert!(slots.windows(2).all(|w| w[0].end <= w[1].start));
        Self { slots }
    }

    /// Free windows over the range minus the busy time of `events`.
    pub fn build(
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        preferences: &UserPreferences,
        tz: &Tz,
        events: &[CalendarEvent],
    ) -> Self {
        let free = build_free_slots(range_start, range_end, preferences, tz);
        let busy = build_busy_intervals(events, tz);
        let slots = subtract_intervals(&free, &busy);

        tracing::debug!(
            days = free.len(),
            busy = busy.len(),
            slots = slots.len(),
            "built slot pool"
        );
        Self::from_slots(slots)
    }

    pub fn slots(&self) -> &[TimeInterval] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of all remaining free time.
    pub fn total_free(&self) -> Duration {
        self.slots.iter().fold(Duration::zero(), |acc, slot| acc + slot.duration())
    }

    /// Earliest slot with room for `duration`, as a block at the slot start.
    ///
    /// First fit, not best fit: a large early slot wins over a snug later one.
    pub fn first_fit(&self, duration: Duration) -> Option<TimeInterval> {
        self.slots
            .iter()
            .find(|slot| slot.can_fit(duration))
            .and_then(|slot| TimeInterval::new(slot.start, slot.start + duration))
    }

    /// Like [`first_fit`](Self::first_fit) but only considering free time
    /// inside `window`.
    pub fn first_fit_within(
        &self,
        window: &TimeInterval,
        duration: Duration,
    ) -> Option<TimeInterval> {
        self.slots
            .iter()
            .take_while(|slot| slot.start < window.end)
            .filter_map(|slot| slot.intersect(window))
            .find(|piece| piece.can_fit(duration))
            .and_then(|piece| TimeInterval::new(piece.start, piece.start + duration))
    }

    /// Remove `block` from the slot that contains it.
    ///
    /// The slot is trimmed, split in two, or dropped when fully consumed.
    /// Returns `false` if no single slot contains the block.
    pub fn reserve(&mut self, block: &TimeInterval) -> bool {
        let Some(index) = self.slots.iter().position(|slot| slot.contains(block)) else {
            return false;
        };

        let remainder = self.slots[index].subtract(block);
        self.slots.splice(index..=index, remainder);
        true
    }
}
