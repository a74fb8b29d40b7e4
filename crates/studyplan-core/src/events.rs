use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::PlanSummary;
use crate::task::carry_over::BringForwardOutcome;
use crate::task::TaskStatus;
use crate::timer::StopOutcome;

/// Every state change made through the planner produces an Event.
/// Front ends drain them to refresh their views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StateRestored {
        tasks: usize,
        logs: usize,
        at: DateTime<Utc>,
    },
    PlanGenerated {
        summary: PlanSummary,
        at: DateTime<Utc>,
    },
    TasksRolledOver {
        count: usize,
        today: NaiveDate,
        at: DateTime<Utc>,
    },
    TasksBroughtForward {
        outcome: BringForwardOutcome,
        at: DateTime<Utc>,
    },
    TaskCreated {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskStatusChanged {
        task_id: String,
        status: TaskStatus,
        at: DateTime<Utc>,
    },
    SettingsSaved {
        at: DateTime<Utc>,
    },
    SessionStarted {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// A new session replaced one that was still active.
    SessionReplaced {
        previous_task_id: String,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_seconds: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        paused_ms: i64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        outcome: StopOutcome,
        at: DateTime<Utc>,
    },
    SessionDiscarded {
        task_id: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// When the event happened.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::StateRestored { at, .. }
            | Event::PlanGenerated { at, .. }
            | Event::TasksRolledOver { at, .. }
            | Event::TasksBroughtForward { at, .. }
            | Event::TaskCreated { at, .. }
            | Event::TaskUpdated { at, .. }
            | Event::TaskDeleted { at, .. }
            | Event::TaskStatusChanged { at, .. }
            | Event::SettingsSaved { at }
            | Event::SessionStarted { at, .. }
            | Event::SessionReplaced { at, .. }
            | Event::SessionPaused { at, .. }
            | Event::SessionResumed { at, .. }
            | Event::SessionStopped { at, .. }
            | Event::SessionDiscarded { at, .. } => *at,
        }
    }
}
