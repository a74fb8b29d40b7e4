//! Carry-over of unfinished tasks.
//!
//! Two policies move tasks between days:
//! - startup rollover pulls every overdue, incomplete task onto today and marks
//!   it with [`CARRY_OVER_MARKER`];
//! - "bring tomorrow forward" pulls tomorrow's plan onto today on request.
//!
//! Neither policy changes a task's id.
//!
//! # Usage
//! ```rust,ignore
//! use studyplan_core::task::carry_over::CarryOverEngine;
//!
//! let moved = CarryOverEngine::new().rollover(&mut store, today);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::next_day;
use crate::task::TaskStore;

/// Title prefix for tasks moved by rollover.
pub const CARRY_OVER_MARKER: &str = "[Carried]";

/// Outcome of a bring-forward request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BringForwardOutcome {
    /// `count` tasks now sit on today.
    Moved { count: usize },
    /// Nothing is planned for tomorrow; the plan needs regenerating.
    NothingScheduled,
}

impl BringForwardOutcome {
    pub fn message(&self) -> String {
        match self {
            BringForwardOutcome::Moved { count } => {
                format!("Moved {count} task(s) from tomorrow's plan to today.")
            }
            BringForwardOutcome::NothingScheduled => {
                "Nothing is planned for tomorrow. Regenerate your plan from settings.".to_string()
            }
        }
    }
}

/// Engine applying the carry-over policies to a [`TaskStore`].
#[derive(Debug, Clone)]
pub struct CarryOverEngine {
    marker: String,
}

impl CarryOverEngine {
    pub fn new() -> Self {
        Self {
            marker: CARRY_OVER_MARKER.to_string(),
        }
    }

    /// Engine with a custom title marker.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Move every incomplete task dated before `today` onto `today`.
    ///
    /// The marker is prefixed once; running this again is a no-op. Returns the
    /// number of tasks that changed.
    pub fn rollover(&self, store: &mut TaskStore, today: NaiveDate) -> usize {
        let mut moved = 0;
        for task in store.iter_mut() {
            if task.is_completed() || task.date >= today {
                continue;
            }
            task.date = today;
            if !task.title.starts_with(&self.marker) {
                task.title = format!("{} {}", self.marker, task.title);
            }
            moved += 1;
        }
        if moved > 0 {
            tracing::info!(moved, %today, "rolled over overdue tasks");
        }
        moved
    }

    /// Move every task dated exactly tomorrow onto `today`.
    pub fn bring_tomorrow_forward(
        &self,
        store: &mut TaskStore,
        today: NaiveDate,
    ) -> BringForwardOutcome {
        let tomorrow = next_day(today);
        let mut count = 0;
        for task in store.iter_mut().filter(|t| t.date == tomorrow) {
            task.date = today;
            count += 1;
        }
        if count == 0 {
            BringForwardOutcome::NothingScheduled
        } else {
            tracing::info!(count, %today, "brought tomorrow's tasks forward");
            BringForwardOutcome::Moved { count }
        }
    }
}

impl Default for CarryOverEngine {
    fn default() -> Self {
        Self::new()
    }
}
