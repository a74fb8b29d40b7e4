use chrono::NaiveDate;
use clap::Subcommand;
use studyplan_core::clock::parse_date;
use studyplan_core::{Config, SettingsUpdate};

use super::{open_planner, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Save new settings and regenerate the plan
    Save {
        /// Exam date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        exam_date: Option<NaiveDate>,
        /// Study minutes per day
        #[arg(long)]
        daily_minutes: Option<u32>,
        /// Study days per week (1-7)
        #[arg(long)]
        days_per_week: Option<u32>,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    match action {
        SettingsAction::Show => print_json(planner.settings())?,
        SettingsAction::Save {
            exam_date,
            daily_minutes,
            days_per_week,
        } => {
            let summary = planner.save_settings(SettingsUpdate {
                exam_date,
                daily_target_minutes: daily_minutes,
                study_days_per_week: days_per_week,
            })?;
            eprintln!("Settings saved; plan regenerated ({} tasks)", summary.generated);
            print_json(&serde_json::json!({
                "settings": planner.settings(),
                "plan": summary,
            }))?;
        }
    }
    Ok(())
}
