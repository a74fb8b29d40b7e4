//! Whole-state snapshot encoding.
//!
//! The stored blob is `{ "settings": {...}, "tasks": [...], "logs": [...] }`.
//! Decoding is lenient: collections are taken only when they are arrays,
//! settings are merged field by field, and an unparseable blob falls back to
//! defaults. Ephemeral state (the running timer, view selection) is never
//! read back.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::settings::Settings;
use crate::study_log::LogEntry;
use crate::task::Task;

/// Key the state blob is stored under.
pub const STORAGE_KEY: &str = "study_planner_v3_data";

#[derive(Serialize)]
struct SnapshotRef<'a> {
    settings: &'a Settings,
    tasks: &'a [Task],
    logs: &'a [LogEntry],
}

/// Serialize the persisted part of the state.
pub fn encode(settings: &Settings, tasks: &[Task], logs: &[LogEntry]) -> serde_json::Result<String> {
    serde_json::to_string(&SnapshotRef {
        settings,
        tasks,
        logs,
    })
}

/// State recovered from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub settings: Settings,
    pub tasks: Vec<Task>,
    pub logs: Vec<LogEntry>,
    /// False when nothing usable was stored and defaults were used.
    pub restored: bool,
}

impl LoadedState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            settings: Settings::new(today),
            tasks: Vec::new(),
            logs: Vec::new(),
            restored: false,
        }
    }
}

/// Decode a stored blob. Never fails; problems are logged.
pub fn decode(raw: Option<&str>, today: NaiveDate) -> LoadedState {
    let mut state = LoadedState::fresh(today);
    let Some(raw) = raw else {
        return state;
    };

    let root = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(root)) => root,
        Ok(_) => {
            tracing::error!("stored state is not a JSON object; starting fresh");
            return state;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to parse stored state; starting fresh");
            return state;
        }
    };

    if let Some(serde_json::Value::Array(items)) = root.get("tasks") {
        state.tasks = decode_items(items, "task");
    }
    if let Some(serde_json::Value::Array(items)) = root.get("logs") {
        state.logs = decode_items(items, "log entry");
    }
    if let Some(serde_json::Value::Object(stored)) = root.get("settings") {
        state.settings.merge_json(stored);
    }
    state.restored = true;
    tracing::debug!(tasks = state.tasks.len(), logs = state.logs.len(), "state loaded");
    state
}

fn decode_items<T: DeserializeOwned>(items: &[serde_json::Value], what: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "skipping malformed {what}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Category, Priority, TaskKind, TaskOrigin, TaskStatus};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn task() -> Task {
        Task {
            id: "task-1".into(),
            title: "Networks".into(),
            category: Category::Technology,
            kind: TaskKind::InputStudy,
            date: today(),
            duration_minutes: 30,
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            origin: TaskOrigin::Generated,
        }
    }

    #[test]
    fn encoded_state_decodes_back() {
        let mut settings = Settings::new(today());
        settings.daily_target_minutes = 60;
        let recorded_at = today().and_hms_opt(18, 0, 0).unwrap().and_utc();
        let logs = vec![LogEntry::new(Some("task-1".into()), 12, today(), recorded_at)];
        let raw = encode(&settings, &[task()], &logs).unwrap();

        let loaded = decode(Some(&raw), today());

        assert!(loaded.restored);
        assert_eq!(loaded.settings, settings);
        assert_eq!(loaded.tasks, vec![task()]);
        assert_eq!(loaded.logs, logs);
    }

    #[test]
    fn out_of_range_settings_keep_defaults() {
        let raw = json!({
            "settings": {
                "exam_date": "2026-05-01",
                "daily_target_minutes": 0,
                "study_days_per_week": 99
            }
        })
        .to_string();
        let loaded = decode(Some(&raw), today());
        assert_eq!(loaded.settings.daily_target_minutes, 45);
        assert_eq!(loaded.settings.study_days_per_week, 7);
        assert_eq!(
            loaded.settings.exam_date,
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
    }

    #[test]
    fn missing_blob_gives_defaults() {
        let loaded = decode(None, today());
        assert!(!loaded.restored);
        assert!(loaded.tasks.is_empty());
        assert_eq!(loaded.settings.start_date, today());
    }

    #[test]
    fn garbage_blob_gives_defaults() {
        let loaded = decode(Some("{not json"), today());
        assert!(!loaded.restored);
        assert_eq!(loaded, LoadedState::fresh(today()));
    }

    #[test]
    fn non_array_collections_are_ignored() {
        let raw = json!({
            "tasks": {"0": "oops"},
            "logs": "nope",
            "settings": {"daily_target_minutes": 20},
            "activeTimer": {"taskId": "task-1"}
        })
        .to_string();

        let loaded = decode(Some(&raw), today());
        assert!(loaded.tasks.is_empty());
        assert!(loaded.logs.is_empty());
        assert_eq!(loaded.settings.daily_target_minutes, 20);
    }

    #[test]
    fn malformed_tasks_are_skipped_individually() {
        let good = serde_json::to_value(task()).unwrap();
        let raw = json!({ "tasks": [good, {"id": "broken"}] }).to_string();

        let loaded = decode(Some(&raw), today());
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].id, "task-1");
    }
}
