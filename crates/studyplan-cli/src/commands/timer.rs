//! Interactive study session.
//!
//! The session lives only as long as this process. A one-second tick redraws
//! the elapsed time on stderr; commands arrive as lines on stdin.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use studyplan_core::{Config, StopOutcome, TimerState};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::{open_planner, print_json, Planner};

const HELP: &str = "p = pause/resume, s = stop and log, q = abort without logging";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Time a study session for a task
    Run {
        /// Task ID
        task_id: String,
    },
}

enum Exit {
    Stop,
    Abort,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;

    let TimerAction::Run { task_id } = action;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(&mut planner, &config, &task_id))?;

    for event in planner.drain_events() {
        tracing::debug!(?event, "planner event");
    }
    Ok(())
}

async fn session(
    planner: &mut Planner,
    config: &Config,
    task_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    planner.start_timer(task_id)?;
    if let Some(task) = planner.task(task_id) {
        eprintln!("Studying: {} ({} min)", task.title, task.duration_minutes);
    }
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    let exit = loop {
        tokio::select! {
            _ = tick.tick() => {
                let display = planner.timer_display();
                let marker = if display.state == TimerState::Paused { " (paused)" } else { "" };
                eprint!("\r{}{marker}    ", display.clock);
                let _ = std::io::stderr().flush();
            }
            line = lines.next_line() => {
                match line? {
                    // end of input stops the session like `s`
                    None => break Exit::Stop,
                    Some(line) => match line.trim() {
                        "p" => toggle_pause(planner)?,
                        "s" => break Exit::Stop,
                        "q" => break Exit::Abort,
                        "" => {}
                        other => eprintln!("\nunknown command '{other}'; {HELP}"),
                    },
                }
            }
        }
    };
    eprintln!();

    match exit {
        Exit::Abort => {
            planner.discard_timer();
            eprintln!("Session aborted; nothing recorded.");
        }
        Exit::Stop => {
            let outcome = planner.stop_timer()?;
            eprintln!("{}", outcome.message());
            if let StopOutcome::GoalReached { task_id, .. } = &outcome {
                if planner.task(task_id).is_some()
                    && (config.timer.auto_complete || confirm(&mut lines).await?)
                {
                    planner.confirm_completion(task_id)?;
                    eprintln!("Task marked completed.");
                }
            }
            print_json(&outcome)?;
        }
    }
    Ok(())
}

fn toggle_pause(planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
    if planner.timer_state() == TimerState::Paused {
        planner.resume_timer()?;
        eprintln!("\nresumed");
    } else {
        planner.pause_timer()?;
        eprintln!("\npaused");
    }
    Ok(())
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("Goal reached. Mark the task completed? [y/N] ");
    let _ = std::io::stderr().flush();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
