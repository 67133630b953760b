//! Request files accepted by the scheduling commands.

use std::io::Read;

use serde::Deserialize;
use timeblock_core::{CalendarEvent, EngineConfig, HabitInput, Planner, TaskInput, UserPreferences};

/// A snapshot of everything one engine call needs.
///
/// `preferences` falls back to the config file when omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
    #[serde(default)]
    pub habits: Vec<HabitInput>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    pub range_start: String,
    pub range_end: String,
}

impl ScheduleRequest {
    /// Read a request from a file path, or stdin for "-".
    pub fn load(source: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = if source == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(source).map_err(|e| format!("cannot read {source}: {e}"))?
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Build a planner for this request using `config` for anything omitted.
    pub fn planner(&self, config: &EngineConfig) -> Result<Planner, Box<dyn std::error::Error>> {
        let preferences = self.preferences.as_ref().unwrap_or(&config.preferences);
        let planner = Planner::new(&self.events, preferences, &self.range_start, &self.range_end)?;
        Ok(planner.with_time_of_day(config.time_of_day))
    }
}
