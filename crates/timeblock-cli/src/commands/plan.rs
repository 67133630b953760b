use serde::Serialize;
use timeblock_core::time::to_local_fixed;
use timeblock_core::EngineConfig;

use crate::request::ScheduleRequest;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn schedule(source: &str) -> CmdResult {
    let request = ScheduleRequest::load(source)?;
    let mut planner = request.planner(&EngineConfig::load_or_default())?;
    let blocks = planner.schedule_tasks(&request.tasks)?;

    let skipped = request.tasks.len() - blocks.len();
    if skipped > 0 {
        tracing::warn!(skipped, "some tasks could not be scheduled in the range");
    }
    print_json(&blocks)
}

pub fn habits(source: &str) -> CmdResult {
    let request = ScheduleRequest::load(source)?;
    let mut planner = request.planner(&EngineConfig::load_or_default())?;
    print_json(&planner.suggest_habits(&request.habits)?)
}

pub fn plan(source: &str) -> CmdResult {
    let request = ScheduleRequest::load(source)?;
    let planner = request.planner(&EngineConfig::load_or_default())?;
    print_json(&planner.plan(&request.tasks, &request.habits)?)
}

#[derive(Serialize)]
struct FreeSlot {
    start: String,
    end: String,
    minutes: i64,
}

pub fn free(source: &str) -> CmdResult {
    let request = ScheduleRequest::load(source)?;
    let planner = request.planner(&EngineConfig::load_or_default())?;
    let tz = planner.time_zone();

    let slots: Vec<FreeSlot> = planner
        .pool()
        .slots()
        .iter()
        .map(|slot| FreeSlot {
            start: to_local_fixed(slot.start, &tz).to_rfc3339(),
            end: to_local_fixed(slot.end, &tz).to_rfc3339(),
            minutes: slot.duration_minutes(),
        })
        .collect();
    print_json(&slots)
}
