//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;
use studyplan_core::clock::parse_date;
use studyplan_core::{
    Category, Config, CoreError, NewTask, Priority, Sheet, Task, TaskKind, TaskPatch, TaskStatus,
};

use super::{open_planner, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Scheduled date (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// technology, management, strategy, afternoon_practice or past_exam
        #[arg(long, default_value = "technology")]
        category: Category,
        /// input_study, past_exam or review
        #[arg(long, default_value = "input_study")]
        kind: TaskKind,
        /// Planned minutes
        #[arg(long, default_value = "30")]
        minutes: u32,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        /// Only tasks on this date
        #[arg(long, conflicts_with = "today", value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Only today's tasks
        #[arg(long)]
        today: bool,
        /// Filter by status (todo or completed)
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Pending tasks of one sheet (input or practice), oldest first
        #[arg(long, conflicts_with = "status")]
        sheet: Option<Sheet>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        kind: Option<TaskKind>,
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task (its logged minutes are kept)
    Delete {
        /// Task ID
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Flip a task between todo and completed
    Toggle {
        /// Task ID
        id: String,
    },
    /// Today's tasks and progress
    Today,
    /// Pull tomorrow's tasks onto today
    Forward,
}

#[derive(Serialize)]
struct TodayView<'a> {
    date: NaiveDate,
    completed: usize,
    total: usize,
    tasks: Vec<&'a Task>,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    match action {
        TaskAction::Create {
            title,
            date,
            category,
            kind,
            minutes,
            priority,
        } => {
            let date = date.unwrap_or_else(|| planner.today());
            let task = planner.create_task(
                NewTask::manual(date, title, category, kind, minutes).with_priority(priority),
            )?;
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List {
            date,
            today,
            status,
            sheet,
        } => {
            let date = if today { Some(planner.today()) } else { date };
            let tasks: Vec<&Task> = match sheet {
                Some(sheet) => planner.tasks().pending_by_sheet(sheet),
                None => planner.tasks().iter().collect(),
            };
            let filtered: Vec<&Task> = tasks
                .into_iter()
                .filter(|t| date.map_or(true, |d| t.date == d))
                .filter(|t| status.map_or(true, |s| t.status == s))
                .collect();
            print_json(&filtered)?;
        }
        TaskAction::Get { id } => {
            let task = planner
                .task(&id)
                .ok_or_else(|| CoreError::task_not_found(&id))?;
            print_json(task)?;
        }
        TaskAction::Update {
            id,
            title,
            date,
            category,
            kind,
            minutes,
            priority,
            status,
        } => {
            let patch = TaskPatch {
                title,
                category,
                kind,
                date,
                duration_minutes: minutes,
                priority,
                status,
            };
            if patch.is_empty() {
                return Err("nothing to update; pass at least one field".into());
            }
            let task = planner.update_task(&id, patch)?;
            print_json(&task)?;
        }
        TaskAction::Delete { id, yes } => {
            if !yes {
                return Err(format!("refusing to delete {id} without --yes").into());
            }
            let task = planner.delete_task(&id)?;
            eprintln!("Task deleted: {}", task.id);
        }
        TaskAction::Toggle { id } => {
            let status = planner.toggle_task(&id)?;
            print_json(&serde_json::json!({ "id": id, "status": status }))?;
        }
        TaskAction::Today => {
            let date = planner.today();
            let (completed, total) = planner.tasks().progress_on(date);
            print_json(&TodayView {
                date,
                completed,
                total,
                tasks: planner.tasks_today(),
            })?;
        }
        TaskAction::Forward => {
            let outcome = planner.bring_tomorrow_forward()?;
            eprintln!("{}", outcome.message());
            print_json(&outcome)?;
        }
    }

    for event in planner.drain_events() {
        tracing::debug!(?event, "planner event");
    }
    Ok(())
}
