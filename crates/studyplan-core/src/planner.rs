//! The planner: one owner for settings, tasks, logs and the session timer.
//!
//! Every command routes through the component APIs and, when it changed
//! persisted state, writes the whole snapshot back before returning. The
//! session timer is never persisted.
//!
//! ## Usage
//!
//! ```ignore
//! let db = Database::open()?;
//! let mut planner = StudyPlanner::load(db, SystemClock)?;
//! planner.bring_tomorrow_forward()?;
//! let stats = planner.stats();
//! ```

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::plan::{PlanGenerator, PlanSummary, RegenerationPolicy};
use crate::settings::{Settings, SettingsUpdate};
use crate::stats::{StatsAggregator, StudyStats};
use crate::storage::{snapshot, StateStore, STORAGE_KEY};
use crate::study_log::StudyLog;
use crate::task::carry_over::{BringForwardOutcome, CarryOverEngine};
use crate::task::{NewTask, Task, TaskPatch, TaskStatus, TaskStore};
use crate::timer::{apply_session, SessionTimer, StopOutcome, TimerDisplay, TimerState};

pub struct StudyPlanner<S: StateStore, C: Clock> {
    store: S,
    clock: C,
    settings: Settings,
    tasks: TaskStore,
    log: StudyLog,
    timer: SessionTimer,
    generator: PlanGenerator,
    carry_over: CarryOverEngine,
    policy: RegenerationPolicy,
    events: Vec<Event>,
}

impl<S: StateStore, C: Clock> StudyPlanner<S, C> {
    /// Restore state from `store` and run the startup pass.
    ///
    /// An empty task list gets a freshly generated plan; otherwise overdue
    /// tasks are rolled over to today.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn load(store: S, clock: C) -> Result<Self> {
        Self::load_with(store, clock, RegenerationPolicy::default())
    }

    pub fn load_with(store: S, clock: C, policy: RegenerationPolicy) -> Result<Self> {
        let today = clock.today();
        let raw = store.read(STORAGE_KEY)?;
        let loaded = snapshot::decode(raw.as_deref(), today);

        let mut planner = Self {
            store,
            clock,
            settings: loaded.settings,
            tasks: TaskStore::from_tasks(loaded.tasks),
            log: StudyLog::from_entries(loaded.logs),
            timer: SessionTimer::new(),
            generator: PlanGenerator::new(),
            carry_over: CarryOverEngine::new(),
            policy,
            events: Vec::new(),
        };

        if loaded.restored {
            planner.events.push(Event::StateRestored {
                tasks: planner.tasks.len(),
                logs: planner.log.len(),
                at: planner.clock.now(),
            });
        }

        if planner.tasks.is_empty() {
            planner.regenerate_plan()?;
        } else {
            planner.rollover()?;
        }
        Ok(planner)
    }

    fn flush(&self) -> Result<()> {
        let blob = snapshot::encode(&self.settings, self.tasks.as_slice(), self.log.entries())?;
        self.store.write(STORAGE_KEY, &blob)?;
        tracing::debug!(
            tasks = self.tasks.len(),
            logs = self.log.len(),
            bytes = blob.len(),
            "state flushed"
        );
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    // ── Queries ──

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn log(&self) -> &StudyLog {
        &self.log
    }

    pub fn policy(&self) -> RegenerationPolicy {
        self.policy
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.find(id)
    }

    pub fn tasks_today(&self) -> Vec<&Task> {
        self.tasks.on_date(self.today())
    }

    pub fn stats(&self) -> StudyStats {
        StatsAggregator::new(&self.tasks, &self.log).summary(self.today(), self.settings.exam_date)
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    /// Read-only view for the display tick.
    pub fn timer_display(&self) -> TimerDisplay {
        self.timer.display(self.clock.now())
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands: tasks ──

    pub fn create_task(&mut self, new: NewTask) -> Result<Task> {
        let task = self.tasks.create(new, self.clock.now())?.clone();
        self.flush()?;
        self.emit(Event::TaskCreated {
            task_id: task.id.clone(),
            at: self.clock.now(),
        });
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self.tasks.update(id, patch)?.clone();
        self.flush()?;
        self.emit(Event::TaskUpdated {
            task_id: task.id.clone(),
            at: self.clock.now(),
        });
        Ok(task)
    }

    /// Remove a task. Log entries that reference it are kept.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.delete(id)?;
        self.flush()?;
        self.emit(Event::TaskDeleted {
            task_id: task.id.clone(),
            at: self.clock.now(),
        });
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<TaskStatus> {
        let status = self.tasks.toggle_status(id)?;
        self.flush()?;
        self.emit(Event::TaskStatusChanged {
            task_id: id.to_string(),
            status,
            at: self.clock.now(),
        });
        Ok(status)
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        self.tasks.set_status(id, status)?;
        self.flush()?;
        self.emit(Event::TaskStatusChanged {
            task_id: id.to_string(),
            status,
            at: self.clock.now(),
        });
        Ok(())
    }

    // ── Commands: plan ──

    /// Move overdue incomplete tasks onto today. Persists only when
    /// something moved.
    pub fn rollover(&mut self) -> Result<usize> {
        let today = self.today();
        let count = self.carry_over.rollover(&mut self.tasks, today);
        if count > 0 {
            self.flush()?;
            self.emit(Event::TasksRolledOver {
                count,
                today,
                at: self.clock.now(),
            });
        }
        Ok(count)
    }

    pub fn bring_tomorrow_forward(&mut self) -> Result<BringForwardOutcome> {
        let today = self.today();
        let outcome = self.carry_over.bring_tomorrow_forward(&mut self.tasks, today);
        if let BringForwardOutcome::Moved { .. } = outcome {
            self.flush()?;
        }
        self.emit(Event::TasksBroughtForward {
            outcome,
            at: self.clock.now(),
        });
        Ok(outcome)
    }

    /// Rebuild the plan from the current settings under the active policy.
    pub fn regenerate_plan(&mut self) -> Result<PlanSummary> {
        let summary = self.generator.regenerate(
            &mut self.tasks,
            self.clock.today(),
            self.settings.exam_date,
            self.settings.daily_target_minutes,
            self.policy,
        );
        self.flush()?;
        self.emit(Event::PlanGenerated {
            summary: summary.clone(),
            at: self.clock.now(),
        });
        Ok(summary)
    }

    /// Apply new settings and regenerate the plan from them.
    ///
    /// # Errors
    /// Returns a validation error, leaving everything unchanged, if the new
    /// values are out of range.
    pub fn save_settings(&mut self, update: SettingsUpdate) -> Result<PlanSummary> {
        self.settings = update.apply_to(&self.settings)?;
        self.emit(Event::SettingsSaved {
            at: self.clock.now(),
        });
        self.regenerate_plan()
    }

    // ── Commands: session timer ──

    /// Start timing `task_id`. A session already in progress is dropped
    /// without being logged.
    pub fn start_timer(&mut self, task_id: &str) -> Result<()> {
        if self.tasks.find(task_id).is_none() {
            return Err(CoreError::task_not_found(task_id));
        }
        let now = self.clock.now();
        if let Some(previous) = self.timer.start(task_id, now) {
            self.emit(Event::SessionReplaced {
                previous_task_id: previous.task_id,
                at: now,
            });
        }
        self.emit(Event::SessionStarted {
            task_id: task_id.to_string(),
            at: now,
        });
        Ok(())
    }

    pub fn pause_timer(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.timer.pause(now)?;
        self.emit(Event::SessionPaused {
            elapsed_seconds: self.timer.elapsed_seconds(now),
            at: now,
        });
        Ok(())
    }

    pub fn resume_timer(&mut self) -> Result<i64> {
        let now = self.clock.now();
        let paused_ms = self.timer.resume(now)?;
        self.emit(Event::SessionResumed { paused_ms, at: now });
        Ok(paused_ms)
    }

    /// Stop the session, log the minutes and update the task.
    pub fn stop_timer(&mut self) -> Result<StopOutcome> {
        let now = self.clock.now();
        let finished = self.timer.stop(now)?;
        let outcome = apply_session(&finished, &mut self.tasks, &mut self.log, self.clock.today());
        if outcome != StopOutcome::NothingRecorded {
            self.flush()?;
        }
        tracing::info!(
            task_id = %finished.task_id,
            minutes = outcome.elapsed_minutes(),
            "session stopped"
        );
        self.emit(Event::SessionStopped {
            outcome: outcome.clone(),
            at: now,
        });
        Ok(outcome)
    }

    /// Drop the session without logging anything.
    pub fn discard_timer(&mut self) -> bool {
        match self.timer.discard() {
            Some(session) => {
                self.emit(Event::SessionDiscarded {
                    task_id: session.task_id,
                    at: self.clock.now(),
                });
                true
            }
            None => false,
        }
    }

    /// Mark a task completed after a session reached its goal.
    pub fn confirm_completion(&mut self, task_id: &str) -> Result<()> {
        self.set_task_status(task_id, TaskStatus::Completed)
    }
}
