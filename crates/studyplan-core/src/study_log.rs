//! Record of study time actually performed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One stopped timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Task the time was logged against. The task may since have been
    /// deleted, in which case lookups come back empty.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Always greater than zero
    pub duration_minutes: u32,
    /// Day the session was stopped on
    pub date: NaiveDate,
}

impl LogEntry {
    /// Entry with an id stamped from `recorded_at`.
    pub fn new(
        task_id: Option<String>,
        duration_minutes: u32,
        date: NaiveDate,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("log-{}-{}", recorded_at.timestamp_millis(), uuid::Uuid::new_v4()),
            task_id,
            duration_minutes,
            date,
        }
    }
}

/// Append-only collection of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyLog {
    entries: Vec<LogEntry>,
}

impl StudyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from loaded entries. Zero-minute entries are dropped.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let before = entries.len();
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| e.duration_minutes > 0)
            .collect();
        if entries.len() != before {
            tracing::warn!(dropped = before - entries.len(), "dropping zero-minute log entries");
        }
        Self { entries }
    }

    /// Append an entry for `minutes` of study. Zero minutes records nothing.
    pub fn record(
        &mut self,
        task_id: Option<String>,
        minutes: u32,
        date: NaiveDate,
        recorded_at: DateTime<Utc>,
    ) -> Option<&LogEntry> {
        if minutes == 0 {
            return None;
        }
        let idx = self.entries.len();
        self.entries.push(LogEntry::new(task_id, minutes, date, recorded_at));
        Some(&self.entries[idx])
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_task<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.task_id.as_deref() == Some(task_id))
    }
}
