//! # Timeblock Core Library
//!
//! This library provides the time-block scheduling engine: it places tasks
//! and recurring habits into a user's day around existing calendar
//! commitments and wake/sleep windows.
//!
//! Every entry point is a pure, synchronous computation over an explicit
//! snapshot of inputs. Nothing is persisted and no clock is read; results are
//! plain data for the caller to store or push to a calendar.
//!
//! ## Architecture
//!
//! - **Interval Algebra**: busy intervals, per-day free windows, set difference
//!   and the [`SlotPool`] they produce
//! - **Task Scheduler**: deadline-then-priority ordering with first-fit placement
//! - **Habit Engine**: recurrence eligibility and preferred time-of-day windows,
//!   emitting proposals only
//!
//! ## Key Components
//!
//! - [`schedule_tasks`]: Place tasks, flagging deadline overflow
//! - [`suggest_habit_blocks`]: Propose habit blocks
//! - [`Planner`]: Run both against one shared pool
//! - [`EngineConfig`]: TOML configuration for callers

pub mod config;
pub mod error;
pub mod habits;
pub mod interval;
pub mod planner;
pub mod preferences;
pub mod scheduler;
pub mod time;

pub use config::EngineConfig;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use habits::{
    suggest_habit_blocks, Frequency, HabitInput, HabitSuggestionBlock, PlacementReason,
    SuggestionStatus, TimeOfDay, TimeOfDayWindows,
};
pub use interval::{
    build_busy_intervals, build_free_slots, subtract_intervals, CalendarEvent, SlotPool,
    TimeInterval,
};
pub use planner::{Plan, Planner};
pub use preferences::{DaySchedule, UserPreferences};
pub use scheduler::{schedule_tasks, ScheduledBlock, TaskInput};
