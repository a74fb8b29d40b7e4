mod engine;
mod outcome;

pub use engine::{ActiveSession, FinishedSession, SessionTimer, TimerDisplay, TimerState};
pub use outcome::{apply_session, StopOutcome};
