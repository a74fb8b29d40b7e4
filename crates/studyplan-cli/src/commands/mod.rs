pub mod config;
pub mod plan;
pub mod settings;
pub mod stats;
pub mod task;
pub mod timer;

use serde::Serialize;
use studyplan_core::{Config, CoreError, Database, StudyPlanner, SystemClock};

pub type Planner = StudyPlanner<Database, SystemClock>;

/// Open the configured database and run the startup pass (plan on first
/// use, rollover afterwards).
pub fn open_planner(config: &Config) -> Result<Planner, CoreError> {
    let db = Database::open_at(&config.db_path()?)?;
    StudyPlanner::load_with(db, SystemClock, config.regeneration_policy())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
