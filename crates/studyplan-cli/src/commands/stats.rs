use clap::Subcommand;
use studyplan_core::Config;

use super::{open_planner, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, today's progress and the exam countdown
    Show,
    /// Minutes per category
    Categories,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let planner = open_planner(&config)?;
    let stats = planner.stats();

    match action {
        StatsAction::Show => print_json(&stats)?,
        StatsAction::Categories => print_json(&stats.by_category)?,
    }
    Ok(())
}
