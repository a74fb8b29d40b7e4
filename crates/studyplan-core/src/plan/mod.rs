//! Automatic study-plan generation.
//!
//! The generator expands a [`Syllabus`] into dated tasks from tomorrow up to
//! (not including) the exam date:
//! - each 7-day block from the first planned day is devoted to one chapter,
//!   cycling through the syllabus if the exam is far away;
//! - Sundays get a single written drill on the week's chapter;
//! - other days get an input-study task sized from the daily target, plus a
//!   short past-exam drill when the target leaves room for one.
//!
//! Generation is a pure function of `(today, exam_date, daily target,
//! syllabus)`. Ids are derived from the date and slot, so repeated calls
//! produce identical plans.

mod syllabus;

pub use syllabus::{Chapter, Syllabus};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::next_day;
use crate::task::{Category, Priority, Task, TaskKind, TaskOrigin, TaskStatus, TaskStore};

/// Title of the fixed weekday drill.
pub const DAILY_DRILL_TITLE: &str = "Drill: morning past-exam questions";

/// Generator tuning. The defaults reproduce the standard 45-minute plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Safety bound on planned days
    pub max_days: u32,
    /// Sunday written drill length (minutes)
    pub sunday_drill_minutes: u32,
    /// Input-study length when the daily target reaches `full_input_threshold`
    pub full_input_minutes: u32,
    /// Input-study length otherwise
    pub short_input_minutes: u32,
    pub full_input_threshold: u32,
    /// Weekday drill length; also the minimum slack needed to schedule it
    pub drill_minutes: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_days: 180,
            sunday_drill_minutes: 45,
            full_input_minutes: 30,
            short_input_minutes: 15,
            full_input_threshold: 45,
            drill_minutes: 15,
        }
    }
}

/// What happens to existing tasks when a plan is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationPolicy {
    /// Wipe every task, including completed and hand-made ones.
    #[default]
    ReplaceAll,
    /// Keep completed tasks and manual tasks; replace generated, unfinished ones.
    KeepUserWork,
}

/// Summary of a regeneration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub generated: usize,
    pub kept: usize,
    pub days: u32,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

/// Deterministic plan generator.
#[derive(Debug, Clone, Default)]
pub struct PlanGenerator {
    syllabus: Syllabus,
    config: PlanConfig,
}

impl PlanGenerator {
    /// Generator over the standard syllabus.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_syllabus(syllabus: Syllabus) -> Self {
        Self {
            syllabus,
            config: PlanConfig::default(),
        }
    }

    /// Build the plan for every day in `(today, exam_date)`, capped at
    /// `max_days` days.
    pub fn generate(
        &self,
        today: NaiveDate,
        exam_date: NaiveDate,
        daily_target_minutes: u32,
    ) -> Vec<Task> {
        let mut tasks = Vec::new();
        let mut day = next_day(today);
        let mut day_count: u32 = 0;

        while day < exam_date && day_count < self.config.max_days {
            let chapter = self.syllabus.for_week((day_count / 7) as usize);
            let mut slot = 0;
            let mut emit = |title: String,
                            category: Category,
                            kind: TaskKind,
                            minutes: u32,
                            priority: Priority| {
                slot += 1;
                tasks.push(Task {
                    id: format!("plan-{}-{}", day.format("%Y%m%d"), slot),
                    title,
                    category,
                    kind,
                    date: day,
                    duration_minutes: minutes,
                    priority,
                    status: TaskStatus::Todo,
                    origin: TaskOrigin::Generated,
                });
            };

            if day.weekday() == Weekday::Sun {
                emit(
                    format!("Written drill: {}", chapter.name),
                    chapter.category,
                    TaskKind::PastExam,
                    self.config.sunday_drill_minutes,
                    Priority::High,
                );
            } else {
                let input = if daily_target_minutes >= self.config.full_input_threshold {
                    self.config.full_input_minutes
                } else {
                    self.config.short_input_minutes
                };
                emit(
                    format!("Study: {}", chapter.name),
                    chapter.category,
                    TaskKind::InputStudy,
                    input,
                    Priority::Medium,
                );
                if daily_target_minutes.saturating_sub(input) >= self.config.drill_minutes {
                    emit(
                        DAILY_DRILL_TITLE.to_string(),
                        Category::PastExam,
                        TaskKind::PastExam,
                        self.config.drill_minutes,
                        Priority::Low,
                    );
                }
            }

            day = next_day(day);
            day_count += 1;
        }

        tasks
    }

    /// Replace the plan held in `store` according to `policy`.
    pub fn regenerate(
        &self,
        store: &mut TaskStore,
        today: NaiveDate,
        exam_date: NaiveDate,
        daily_target_minutes: u32,
        policy: RegenerationPolicy,
    ) -> PlanSummary {
        match policy {
            RegenerationPolicy::ReplaceAll => store.clear(),
            RegenerationPolicy::KeepUserWork => store
                .retain(|t| t.is_completed() || t.origin == TaskOrigin::Manual),
        }
        let kept = store.len();

        let plan = self.generate(today, exam_date, daily_target_minutes);
        let first_day = plan.first().map(|t| t.date);
        let last_day = plan.last().map(|t| t.date);
        let days = match (first_day, last_day) {
            (Some(first), Some(last)) => ((last - first).num_days() + 1) as u32,
            _ => 0,
        };
        let generated = plan.len();
        for task in plan {
            store.insert(task);
        }

        tracing::info!(generated, kept, days, %exam_date, ?policy, "generated study plan");
        PlanSummary {
            generated,
            kept,
            days,
            first_day,
            last_day,
        }
    }
}
