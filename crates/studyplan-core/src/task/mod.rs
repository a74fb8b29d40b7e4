//! Study tasks and the ordered task store.
//!
//! A [`Task`] is one unit of planned study on a calendar date. The
//! [`TaskStore`] keeps tasks in insertion order and is the only place that
//! creates ids, so id uniqueness is enforced here.

pub mod carry_over;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result, ValidationError};

/// Subject area a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technology,
    Management,
    Strategy,
    AfternoonPractice,
    PastExam,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Management => "management",
            Category::Strategy => "strategy",
            Category::AfternoonPractice => "afternoon_practice",
            Category::PastExam => "past_exam",
        }
    }
}

/// What sort of study a task is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Reading and note-taking on new material.
    InputStudy,
    /// Drilling past exam questions.
    PastExam,
    Review,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::InputStudy => "input_study",
            TaskKind::PastExam => "past_exam",
            TaskKind::Review => "review",
        }
    }
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::InputStudy
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Todo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Who created a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskOrigin {
    /// Emitted by the plan generator.
    Generated,
    /// Entered by the user.
    Manual,
}

impl Default for TaskOrigin {
    fn default() -> Self {
        TaskOrigin::Manual
    }
}

/// The two task lists the front end shows side by side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    /// Input-study tasks.
    Input,
    /// Drills, past exams and review.
    Practice,
}

impl Sheet {
    pub fn of(kind: TaskKind) -> Self {
        match kind {
            TaskKind::InputStudy => Sheet::Input,
            TaskKind::PastExam | TaskKind::Review => Sheet::Practice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sheet::Input => "input",
            Sheet::Practice => "practice",
        }
    }
}

macro_rules! label_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

label_enum!(Category, "category", [
    Category::Technology,
    Category::Management,
    Category::Strategy,
    Category::AfternoonPractice,
    Category::PastExam,
]);
label_enum!(TaskKind, "kind", [TaskKind::InputStudy, TaskKind::PastExam, TaskKind::Review]);
label_enum!(Priority, "priority", [Priority::Low, Priority::Medium, Priority::High]);
label_enum!(TaskStatus, "status", [TaskStatus::Todo, TaskStatus::Completed]);
label_enum!(Sheet, "sheet", [Sheet::Input, Sheet::Practice]);

/// A unit of planned study.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, never reassigned
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub kind: TaskKind,
    /// Calendar date the task is scheduled on
    pub date: NaiveDate,
    /// Remaining (or target) minutes; the session timer lowers it
    pub duration_minutes: u32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub origin: TaskOrigin,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn sheet(&self) -> Sheet {
        Sheet::of(self.kind)
    }
}

/// Fields needed to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: NaiveDate,
    pub title: String,
    pub category: Category,
    pub kind: TaskKind,
    pub duration_minutes: u32,
    pub priority: Priority,
    pub origin: TaskOrigin,
}

impl NewTask {
    /// A user-entered task with medium priority.
    pub fn manual(
        date: NaiveDate,
        title: impl Into<String>,
        category: Category,
        kind: TaskKind,
        duration_minutes: u32,
    ) -> Self {
        Self {
            date,
            title: title.into(),
            category,
            kind,
            duration_minutes,
            priority: Priority::Medium,
            origin: TaskOrigin::Manual,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update merged into an existing task. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub kind: Option<TaskKind>,
    pub date: Option<NaiveDate>,
    pub duration_minutes: Option<u32>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

fn validate_title(title: &str) -> std::result::Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

/// Fresh task id: `task-<unix seconds>-<uuid v4>`.
pub fn new_task_id(now: DateTime<Utc>) -> String {
    format!("task-{}-{}", now.timestamp(), uuid::Uuid::new_v4())
}

/// Ordered collection of tasks with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded tasks, dropping later duplicates of an id.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            if store.find(&task.id).is_some() {
                tracing::warn!(id = %task.id, "dropping task with duplicate id");
                continue;
            }
            store.tasks.push(task);
        }
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.date == date).collect()
    }

    pub fn with_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Incomplete tasks of one sheet, earliest date first. Ties keep
    /// insertion order.
    pub fn pending_by_sheet(&self, sheet: Sheet) -> Vec<&Task> {
        let mut pending: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.is_completed() && t.sheet() == sheet)
            .collect();
        pending.sort_by_key(|t| t.date);
        pending
    }

    /// `(completed, total)` for one date.
    pub fn progress_on(&self, date: NaiveDate) -> (usize, usize) {
        let todays = self.on_date(date);
        let done = todays.iter().filter(|t| t.is_completed()).count();
        (done, todays.len())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a task with a fresh id stamped from `now`.
    pub fn create(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<&Task> {
        validate_title(&new.title)?;
        let mut id = new_task_id(now);
        while self.find(&id).is_some() {
            id = new_task_id(now);
        }
        let idx = self.tasks.len();
        self.tasks.push(Task {
            id,
            title: new.title,
            category: new.category,
            kind: new.kind,
            date: new.date,
            duration_minutes: new.duration_minutes,
            priority: new.priority,
            status: TaskStatus::Todo,
            origin: new.origin,
        });
        Ok(&self.tasks[idx])
    }

    /// Append an already-built task. A clashing id gets a numeric suffix.
    pub fn insert(&mut self, mut task: Task) -> &Task {
        if self.find(&task.id).is_some() {
            let base = task.id.clone();
            let mut n = 2;
            while self.find(&format!("{base}-{n}")).is_some() {
                n += 1;
            }
            task.id = format!("{base}-{n}");
        }
        let idx = self.tasks.len();
        self.tasks.push(task);
        &self.tasks[idx]
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        let task = self.get_mut(id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(kind) = patch.kind {
            task.kind = kind;
        }
        if let Some(date) = patch.date {
            task.date = date;
        }
        if let Some(minutes) = patch.duration_minutes {
            task.duration_minutes = minutes;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        Ok(task)
    }

    /// Remove a task. Log entries pointing at it are left as they are.
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::task_not_found(id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn toggle_status(&mut self, id: &str) -> Result<TaskStatus> {
        let task = self.get_mut(id)?;
        task.status = task.status.toggled();
        Ok(task.status)
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        self.get_mut(id)?.status = status;
        Ok(())
    }

    /// Keep only tasks for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Task) -> bool) {
        self.tasks.retain(keep);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::task_not_found(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

}
