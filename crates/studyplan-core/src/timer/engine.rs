//! Session timer implementation.
//!
//! The timer is a wall-clock stopwatch bound to one task. It does not use
//! internal threads; every command takes the current instant, and the display
//! refresh is a read-only query.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> (stop) Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new();
//! timer.start("task-1", clock.now());
//! // once a second:
//! let display = timer.display(clock.now());
//! let finished = timer.stop(clock.now())?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;

const MS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// The one session currently being timed. Lives for the process only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    /// Milliseconds spent paused in completed pause intervals.
    pub paused_total_ms: i64,
    /// Set while paused.
    pub paused_at: Option<DateTime<Utc>>,
}

impl ActiveSession {
    fn new(task_id: String, now: DateTime<Utc>) -> Self {
        Self {
            task_id,
            started_at: now,
            paused_total_ms: 0,
            paused_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// The instant elapsed time is measured up to: the pause start while
    /// paused, `now` otherwise.
    fn effective_now(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.paused_at.unwrap_or(now)
    }

    /// Active (unpaused) milliseconds, never negative.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        let span = (self.effective_now(now) - self.started_at).num_milliseconds();
        (span - self.paused_total_ms).max(0)
    }
}

/// A session that has been stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedSession {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    /// `elapsed_ms` rounded up to whole minutes
    pub elapsed_minutes: u32,
}

/// Read-only view for the once-a-second display tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDisplay {
    pub task_id: Option<String>,
    pub state: TimerState,
    pub elapsed_seconds: u64,
    /// `MM:SS`
    pub clock: String,
}

/// Pause/resume stopwatch holding at most one session.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    session: Option<ActiveSession>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match &self.session {
            None => TimerState::Idle,
            Some(s) if s.is_paused() => TimerState::Paused,
            Some(_) => TimerState::Running,
        }
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.task_id.as_str())
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.session
            .as_ref()
            .map(|s| (s.elapsed_ms(now) / 1000) as u64)
            .unwrap_or(0)
    }

    pub fn display(&self, now: DateTime<Utc>) -> TimerDisplay {
        let secs = self.elapsed_seconds(now);
        TimerDisplay {
            task_id: self.task_id().map(str::to_string),
            state: self.state(),
            elapsed_seconds: secs,
            clock: format!("{:02}:{:02}", secs / 60, secs % 60),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin timing `task_id`. An unfinished session is discarded and
    /// returned.
    pub fn start(&mut self, task_id: impl Into<String>, now: DateTime<Utc>) -> Option<ActiveSession> {
        let previous = self.session.replace(ActiveSession::new(task_id.into(), now));
        if let Some(prev) = &previous {
            tracing::warn!(task_id = %prev.task_id, "discarding unfinished timer session");
        }
        previous
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        match self.session.as_mut() {
            Some(s) if !s.is_paused() => {
                s.paused_at = Some(now);
                Ok(())
            }
            Some(_) => Err(TimerError::NotRunning),
            None => Err(TimerError::Idle),
        }
    }

    /// Resume a paused session. Returns the length of the pause in ms.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<i64, TimerError> {
        let session = self.session.as_mut().ok_or(TimerError::Idle)?;
        let paused_at = session.paused_at.take().ok_or(TimerError::NotPaused)?;
        let paused_ms = (now - paused_at).num_milliseconds().max(0);
        session.paused_total_ms += paused_ms;
        Ok(paused_ms)
    }

    /// End the session. The timer returns to idle whatever the elapsed time.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<FinishedSession, TimerError> {
        let session = self.session.take().ok_or(TimerError::Idle)?;
        let elapsed_ms = session.elapsed_ms(now);
        Ok(FinishedSession {
            elapsed_minutes: ceil_minutes(elapsed_ms),
            task_id: session.task_id,
            started_at: session.started_at,
            stopped_at: now,
            elapsed_ms,
        })
    }

    /// Drop the session without recording anything.
    pub fn discard(&mut self) -> Option<ActiveSession> {
        self.session.take()
    }
}

fn ceil_minutes(ms: i64) -> u32 {
    if ms <= 0 {
        0
    } else {
        ((ms + MS_PER_MINUTE - 1) / MS_PER_MINUTE) as u32
    }
}
