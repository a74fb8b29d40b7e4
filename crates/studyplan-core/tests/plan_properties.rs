//! Property tests for plan generation, rollover and the session timer.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;
use studyplan_core::task::carry_over::CARRY_OVER_MARKER;
use studyplan_core::{
    CarryOverEngine, Category, NewTask, PlanGenerator, SessionTimer, TaskKind, TaskStatus,
    TaskStore,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(offset)
}

proptest! {
    #[test]
    fn generation_is_deterministic(start in 0i64..400, span in 0i64..250, target in 1u32..240) {
        let generator = PlanGenerator::new();
        let a = generator.generate(day(start), day(start + span), target);
        let b = generator.generate(day(start), day(start + span), target);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn generation_stays_within_bounds(start in 0i64..400, span in 0i64..250, target in 1u32..240) {
        let today = day(start);
        let exam = day(start + span);
        let plan = PlanGenerator::new().generate(today, exam, target);

        let mut days: Vec<_> = plan.iter().map(|t| t.date).collect();
        days.dedup();
        prop_assert!(days.len() <= 180);
        for task in &plan {
            prop_assert!(task.date > today);
            prop_assert!(task.date < exam);
            prop_assert_eq!(task.status, TaskStatus::Todo);
        }
        if span <= 1 {
            prop_assert!(plan.is_empty());
        }
    }

    #[test]
    fn one_chapter_per_week(start in 0i64..400, target in 1u32..240) {
        let today = day(start);
        let plan = PlanGenerator::new().generate(today, day(start + 60), target);

        for task in &plan {
            let week = ((task.date - today).num_days() - 1) / 7;
            let same_week = plan
                .iter()
                .filter(|t| ((t.date - today).num_days() - 1) / 7 == week)
                .filter(|t| t.title.starts_with("Study: ") || t.title.starts_with("Written drill: "));
            let chapters: Vec<_> = same_week
                .map(|t| t.title.split_once(": ").map(|(_, c)| c.to_string()))
                .collect();
            prop_assert!(chapters.windows(2).all(|w| w[0] == w[1]));

            if task.date.weekday() == Weekday::Sun {
                prop_assert_eq!(task.kind, TaskKind::PastExam);
                prop_assert_eq!(task.duration_minutes, 45);
            }
        }
    }

    #[test]
    fn rollover_is_idempotent(offsets in prop::collection::vec(-10i64..10, 1..20), done in prop::collection::vec(any::<bool>(), 20)) {
        let today = day(30);
        let now = today.and_hms_opt(9, 0, 0).unwrap().and_utc();
        let mut store = TaskStore::new();
        for (i, offset) in offsets.iter().enumerate() {
            let id = store
                .create(NewTask::manual(today + Duration::days(*offset), format!("t{i}"), Category::Technology, TaskKind::Review, 10), now)
                .unwrap()
                .id
                .clone();
            if done[i] {
                store.toggle_status(&id).unwrap();
            }
        }

        let engine = CarryOverEngine::new();
        engine.rollover(&mut store, today);
        let once = store.clone();
        prop_assert_eq!(engine.rollover(&mut store, today), 0);
        prop_assert_eq!(&store, &once);

        let doubled = format!("{CARRY_OVER_MARKER} {CARRY_OVER_MARKER}");
        for task in store.iter() {
            if !task.is_completed() {
                prop_assert!(task.date >= today);
            }
            prop_assert!(!task.title.starts_with(&doubled));
        }
    }

    #[test]
    fn elapsed_never_decreases_while_running(steps in prop::collection::vec(0i64..120_000, 1..30)) {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut timer = SessionTimer::new();
        timer.start("task-1", start);

        let mut now = start;
        let mut last = 0;
        for step in steps {
            now += Duration::milliseconds(step);
            let secs = timer.elapsed_seconds(now);
            prop_assert!(secs >= last);
            last = secs;
        }
    }

    #[test]
    fn elapsed_is_frozen_while_paused(run_ms in 0i64..600_000, later in 0i64..600_000) {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut timer = SessionTimer::new();
        timer.start("task-1", start);
        let paused_at = start + Duration::milliseconds(run_ms);
        timer.pause(paused_at).unwrap();

        let frozen = timer.elapsed_seconds(paused_at);
        prop_assert_eq!(timer.elapsed_seconds(paused_at + Duration::milliseconds(later)), frozen);
    }

    #[test]
    fn stop_minutes_exclude_the_pause(before in 0i64..3_600_000, pause in 0i64..3_600_000, after in 0i64..3_600_000) {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut timer = SessionTimer::new();
        timer.start("task-1", t0);
        timer.pause(t0 + Duration::milliseconds(before)).unwrap();
        timer.resume(t0 + Duration::milliseconds(before + pause)).unwrap();
        let finished = timer.stop(t0 + Duration::milliseconds(before + pause + after)).unwrap();

        let active = before + after;
        let expected = (active + 59_999) / 60_000;
        prop_assert_eq!(i64::from(finished.elapsed_minutes), expected);
    }
}
