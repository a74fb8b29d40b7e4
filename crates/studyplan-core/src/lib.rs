//! # Study Planner Core Library
//!
//! This library provides the core logic of a personal exam study planner.
//! It follows a CLI-first philosophy: every operation is available through
//! the standalone CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Plan Generator**: deterministic daily plan from today to the exam date,
//!   cycling through a fixed syllabus one chapter per week
//! - **Carry-over**: rollover of overdue tasks and bring-tomorrow-forward
//! - **Session Timer**: a wall-clock stopwatch bound to one task, whose result
//!   is logged and subtracted from the task's remaining minutes
//! - **Stats**: pure aggregation of logged minutes by category and day
//! - **Storage**: the whole state as one JSON blob in SQLite, plus TOML
//!   application configuration
//!
//! ## Key Components
//!
//! - [`StudyPlanner`]: owns the state and flushes it after every mutation
//! - [`PlanGenerator`]: plan construction
//! - [`SessionTimer`]: pause/resume stopwatch
//! - [`Database`]: blob persistence
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod plan;
pub mod planner;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod study_log;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, TimerError, ValidationError};
pub use events::Event;
pub use plan::{PlanGenerator, PlanSummary, RegenerationPolicy, Syllabus};
pub use planner::StudyPlanner;
pub use settings::{Settings, SettingsUpdate};
pub use stats::{StatsAggregator, StudyStats};
pub use storage::{Config, Database, StateStore};
pub use study_log::{LogEntry, StudyLog};
pub use task::carry_over::{BringForwardOutcome, CarryOverEngine};
pub use task::{Category, NewTask, Priority, Sheet, Task, TaskKind, TaskPatch, TaskStatus, TaskStore};
pub use timer::{SessionTimer, StopOutcome, TimerDisplay, TimerState};
