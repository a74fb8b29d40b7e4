//! Applying a stopped session to the task store and the study log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::FinishedSession;
use crate::study_log::StudyLog;
use crate::task::TaskStore;

/// What a stopped session amounted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StopOutcome {
    /// Less than a minute of active time: nothing logged, nothing changed.
    NothingRecorded,
    /// The session met the task's remaining minutes. The task is left as is;
    /// the caller may confirm completion.
    GoalReached {
        task_id: String,
        log_id: String,
        elapsed_minutes: u32,
    },
    /// The session fell short; the task now holds the minutes still to go.
    PartialProgress {
        task_id: String,
        log_id: String,
        elapsed_minutes: u32,
        remaining_minutes: u32,
    },
}

impl StopOutcome {
    pub fn elapsed_minutes(&self) -> u32 {
        match self {
            StopOutcome::NothingRecorded => 0,
            StopOutcome::GoalReached { elapsed_minutes, .. }
            | StopOutcome::PartialProgress { elapsed_minutes, .. } => *elapsed_minutes,
        }
    }

    pub fn message(&self) -> String {
        match self {
            StopOutcome::NothingRecorded => "Less than a minute studied; nothing recorded.".into(),
            StopOutcome::GoalReached { elapsed_minutes, .. } => {
                format!("Studied {elapsed_minutes} min. Goal reached!")
            }
            StopOutcome::PartialProgress {
                elapsed_minutes,
                remaining_minutes,
                ..
            } => format!(
                "Studied {elapsed_minutes} min. {remaining_minutes} min left on this task."
            ),
        }
    }
}

/// Log the session and update the bound task's remaining minutes.
///
/// A session whose task has been deleted is still logged and counts as
/// reaching a zero-minute goal.
pub fn apply_session(
    finished: &FinishedSession,
    tasks: &mut TaskStore,
    log: &mut StudyLog,
    today: NaiveDate,
) -> StopOutcome {
    let minutes = finished.elapsed_minutes;
    let log_id = match log.record(
        Some(finished.task_id.clone()),
        minutes,
        today,
        finished.stopped_at,
    ) {
        Some(entry) => entry.id.clone(),
        None => return StopOutcome::NothingRecorded,
    };

    let target = tasks
        .find(&finished.task_id)
        .map(|t| t.duration_minutes)
        .unwrap_or(0);
    let remaining = i64::from(target) - i64::from(minutes);

    if remaining <= 0 {
        return StopOutcome::GoalReached {
            task_id: finished.task_id.clone(),
            log_id,
            elapsed_minutes: minutes,
        };
    }

    if let Ok(task) = tasks.get_mut(&finished.task_id) {
        task.duration_minutes = remaining as u32;
    }
    StopOutcome::PartialProgress {
        task_id: finished.task_id.clone(),
        log_id,
        elapsed_minutes: minutes,
        remaining_minutes: remaining as u32,
    }
}
