use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use studyplan_core::{Config, Task};

use super::{open_planner, print_json};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Rebuild the plan from the current settings
    Generate,
    /// Upcoming tasks grouped by day
    Show {
        /// Number of days to show, starting today
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    match action {
        PlanAction::Generate => {
            let summary = planner.regenerate_plan()?;
            eprintln!(
                "Generated {} task(s) over {} day(s), kept {} ({:?})",
                summary.generated,
                summary.days,
                summary.kept,
                planner.policy()
            );
            print_json(&summary)?;
        }
        PlanAction::Show { days } => {
            let from = planner.today();
            let until = from + Duration::days(i64::from(days));
            let mut by_day: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
            for task in planner.tasks().iter().filter(|t| t.date >= from && t.date < until) {
                by_day.entry(task.date).or_default().push(task);
            }
            print_json(&by_day)?;
        }
    }
    Ok(())
}
