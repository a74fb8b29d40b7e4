//! Integration tests driving the planner against an in-memory store.

use chrono::{Duration, NaiveDate};
use studyplan_core::storage::STORAGE_KEY;
use studyplan_core::{
    BringForwardOutcome, Category, Clock, Database, Event, ManualClock, NewTask, Priority,
    RegenerationPolicy, SettingsUpdate, StateStore, StopOutcome, StudyPlanner, Syllabus, TaskKind,
    TaskStatus,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

// 2026-03-01 is a Sunday; the first planned day is Monday 2026-03-02.
fn open(db: &Database, m: u32, d: u32) -> StudyPlanner<&Database, ManualClock> {
    StudyPlanner::load(db, ManualClock::at(date(m, d), 9, 0)).unwrap()
}

#[test]
fn test_first_run_plans_until_exam() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);

    // 48 days up to 2026-04-18: 6 Sundays with one task, 42 weekdays with two
    let summary = match planner.drain_events().as_slice() {
        [Event::PlanGenerated { summary, .. }] => summary.clone(),
        other => panic!("unexpected events {other:?}"),
    };
    assert_eq!(summary.generated, 90);
    assert_eq!(summary.days, 48);
    assert_eq!(summary.first_day, Some(date(3, 2)));
    assert_eq!(summary.last_day, Some(date(4, 18)));

    let monday = planner.tasks().on_date(date(3, 2));
    let syllabus = Syllabus::standard();
    let first_chapter = &syllabus.chapters()[0];
    assert_eq!(monday.len(), 2);
    assert_eq!(monday[0].title, format!("Study: {}", first_chapter.name));
    assert_eq!(monday[0].duration_minutes, 30);
    assert_eq!(monday[0].priority, Priority::Medium);
    assert_eq!(monday[1].category, Category::PastExam);
    assert_eq!(monday[1].duration_minutes, 15);
    assert_eq!(monday[1].priority, Priority::Low);

    let sunday = planner.tasks().on_date(date(3, 8));
    assert_eq!(sunday.len(), 1);
    assert_eq!(sunday[0].kind, TaskKind::PastExam);
    assert_eq!(sunday[0].duration_minutes, 45);
    assert_eq!(sunday[0].priority, Priority::High);
}

#[test]
fn test_twenty_minute_target_has_no_drill() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);
    planner
        .save_settings(SettingsUpdate {
            daily_target_minutes: Some(20),
            ..Default::default()
        })
        .unwrap();

    let monday = planner.tasks().on_date(date(3, 2));
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].kind, TaskKind::InputStudy);
    assert_eq!(monday[0].duration_minutes, 15);
}

#[test]
fn test_exam_tomorrow_gives_empty_plan() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);
    let summary = planner
        .save_settings(SettingsUpdate {
            exam_date: Some(date(3, 2)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(summary.generated, 0);
    assert!(planner.tasks().is_empty());
    assert_eq!(
        planner.bring_tomorrow_forward().unwrap(),
        BringForwardOutcome::NothingScheduled
    );
}

#[test]
fn test_rollover_on_later_startup_is_idempotent() {
    let db = Database::open_memory().unwrap();
    drop(open(&db, 3, 1));

    let mut later = open(&db, 3, 4);
    let rolled = later
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            Event::TasksRolledOver { count, .. } => Some(count),
            _ => None,
        });
    assert_eq!(rolled, Some(4));

    let today = later.tasks_today();
    assert_eq!(today.len(), 6);
    let carried: Vec<_> = today
        .iter()
        .filter(|t| t.title.starts_with("[Carried] "))
        .collect();
    assert_eq!(carried.len(), 4);
    assert!(carried.iter().all(|t| t.id.starts_with("plan-2026030")));
    drop(later);

    let mut again = open(&db, 3, 4);
    assert_eq!(again.rollover().unwrap(), 0);
    assert!(again
        .tasks_today()
        .iter()
        .all(|t| !t.title.starts_with("[Carried] [Carried]")));
}

#[test]
fn test_completed_tasks_do_not_roll_over() {
    let db = Database::open_memory().unwrap();
    let mut first = open(&db, 3, 1);
    first.toggle_task("plan-20260302-1").unwrap();
    drop(first);

    let later = open(&db, 3, 3);
    let done = later.task("plan-20260302-1").unwrap();
    assert_eq!(done.date, date(3, 2));
    assert!(!done.title.starts_with("[Carried]"));
    assert_eq!(later.task("plan-20260302-2").unwrap().date, date(3, 3));
}

#[test]
fn test_bring_tomorrow_forward_persists() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);
    assert_eq!(
        planner.bring_tomorrow_forward().unwrap(),
        BringForwardOutcome::Moved { count: 2 }
    );
    assert_eq!(planner.tasks_today().len(), 2);
    drop(planner);

    let reloaded = open(&db, 3, 1);
    assert_eq!(reloaded.tasks_today().len(), 2);
    assert!(reloaded.tasks().on_date(date(3, 2)).is_empty());
}

#[test]
fn test_partial_session_reduces_remaining_minutes() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);

    planner.start_timer("plan-20260302-1").unwrap();
    planner.clock().advance(Duration::minutes(20));
    let outcome = planner.stop_timer().unwrap();

    match outcome {
        StopOutcome::PartialProgress {
            elapsed_minutes,
            remaining_minutes,
            ..
        } => {
            assert_eq!(elapsed_minutes, 20);
            assert_eq!(remaining_minutes, 10);
        }
        other => panic!("expected partial progress, got {other:?}"),
    }
    assert_eq!(planner.task("plan-20260302-1").unwrap().duration_minutes, 10);
    assert_eq!(planner.log().len(), 1);
    assert_eq!(planner.log().entries()[0].date, date(3, 1));
}

#[test]
fn test_goal_reached_then_confirmed() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);

    planner.start_timer("plan-20260302-1").unwrap();
    planner.clock().advance(Duration::minutes(35));
    let outcome = planner.stop_timer().unwrap();
    assert!(matches!(
        outcome,
        StopOutcome::GoalReached {
            elapsed_minutes: 35,
            ..
        }
    ));

    let task = planner.task("plan-20260302-1").unwrap();
    assert_eq!(task.duration_minutes, 30);
    assert_eq!(task.status, TaskStatus::Todo);

    planner.confirm_completion("plan-20260302-1").unwrap();
    drop(planner);
    let reloaded = open(&db, 3, 1);
    assert!(reloaded.task("plan-20260302-1").unwrap().is_completed());
    assert_eq!(reloaded.stats().total_minutes, 35);
}

#[test]
fn test_deleted_task_session_is_uncategorized() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);

    planner.start_timer("plan-20260302-2").unwrap();
    planner.delete_task("plan-20260302-2").unwrap();
    planner.clock().advance(Duration::minutes(10));

    assert!(matches!(
        planner.stop_timer().unwrap(),
        StopOutcome::GoalReached { .. }
    ));
    let stats = planner.stats();
    assert_eq!(stats.total_minutes, 10);
    assert_eq!(stats.by_category.get("uncategorized"), Some(&10));
}

#[test]
fn test_starting_a_new_session_replaces_the_old_one() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);
    planner.drain_events();

    planner.start_timer("plan-20260302-1").unwrap();
    planner.clock().advance(Duration::minutes(5));
    planner.start_timer("plan-20260302-2").unwrap();

    let events = planner.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::SessionReplaced { previous_task_id, .. } if previous_task_id == "plan-20260302-1"
    )));
    assert_eq!(planner.timer_display().elapsed_seconds, 0);
    assert!(planner.discard_timer());
    assert!(planner.log().is_empty());
}

#[test]
fn test_keep_user_work_policy() {
    let db = Database::open_memory().unwrap();
    let mut planner =
        StudyPlanner::load_with(&db, ManualClock::at(date(3, 1), 9, 0), RegenerationPolicy::KeepUserWork)
            .unwrap();
    planner.toggle_task("plan-20260302-1").unwrap();
    let manual = planner
        .create_task(NewTask::manual(
            date(3, 5),
            "Flashcards",
            Category::Management,
            TaskKind::Review,
            10,
        ))
        .unwrap();

    let summary = planner
        .save_settings(SettingsUpdate {
            daily_target_minutes: Some(20),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(summary.kept, 2);
    assert_eq!(summary.generated, 48);
    assert_eq!(planner.tasks().len(), 50);
    assert!(planner.task("plan-20260302-1").unwrap().is_completed());
    assert!(planner.task(&manual.id).is_some());
    assert!(planner.task("plan-20260302-1-2").is_some());
    let stamp = planner.clock().now().timestamp();
    assert!(manual.id.starts_with(&format!("task-{stamp}-")));
}

#[test]
fn test_replace_all_policy_drops_everything() {
    let db = Database::open_memory().unwrap();
    let mut planner = open(&db, 3, 1);
    planner.toggle_task("plan-20260302-1").unwrap();
    planner
        .create_task(NewTask::manual(
            date(3, 5),
            "Flashcards",
            Category::Management,
            TaskKind::Review,
            10,
        ))
        .unwrap();

    let summary = planner.regenerate_plan().unwrap();
    assert_eq!(summary.kept, 0);
    assert_eq!(planner.tasks().len(), 90);
    assert!(!planner.task("plan-20260302-1").unwrap().is_completed());
}

#[test]
fn test_corrupt_state_starts_fresh() {
    let db = Database::open_memory().unwrap();
    db.write(STORAGE_KEY, "{\"tasks\": [").unwrap();

    let planner = open(&db, 3, 1);
    assert_eq!(planner.tasks().len(), 90);
    assert_eq!(planner.settings().start_date, date(3, 1));
}

#[test]
fn test_out_of_range_stored_settings_fall_back_to_defaults() {
    let db = Database::open_memory().unwrap();
    db.write(
        STORAGE_KEY,
        r#"{"settings":{"daily_target_minutes":0,"study_days_per_week":99}}"#,
    )
    .unwrap();

    let mut planner = open(&db, 3, 1);
    assert_eq!(planner.settings().daily_target_minutes, 45);
    assert_eq!(planner.settings().study_days_per_week, 7);

    planner
        .save_settings(SettingsUpdate {
            exam_date: Some(date(5, 1)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(planner.settings().exam_date, date(5, 1));
}
