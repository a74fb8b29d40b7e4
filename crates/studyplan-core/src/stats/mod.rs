//! Statistics over logged study time.
//!
//! Everything here is a pure read over the study log and task store. Log
//! entries whose task no longer exists are counted under
//! [`UNCATEGORIZED`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::days_until;
use crate::study_log::StudyLog;
use crate::task::{Category, TaskStore};

/// Bucket for minutes whose task cannot be resolved.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Where a log entry's minutes are attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryBucket {
    Known(Category),
    Uncategorized,
}

impl CategoryBucket {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryBucket::Known(c) => c.as_str(),
            CategoryBucket::Uncategorized => UNCATEGORIZED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStats {
    pub total_minutes: u64,
    /// `total_minutes / 60`, rounded down
    pub total_hours: u64,
    pub today_minutes: u64,
    /// Category label to minutes, ready for charting
    pub by_category: BTreeMap<String, u64>,
    pub by_day: BTreeMap<NaiveDate, u64>,
    pub days_until_exam: i64,
    /// Completed tasks scheduled today
    pub today_completed: usize,
    /// All tasks scheduled today
    pub today_total: usize,
}

/// Aggregates the study log against the current task list.
pub struct StatsAggregator<'a> {
    tasks: &'a TaskStore,
    log: &'a StudyLog,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(tasks: &'a TaskStore, log: &'a StudyLog) -> Self {
        Self { tasks, log }
    }

    pub fn total_minutes(&self) -> u64 {
        self.log
            .entries()
            .iter()
            .map(|e| u64::from(e.duration_minutes))
            .sum()
    }

    pub fn minutes_on(&self, date: NaiveDate) -> u64 {
        self.log
            .entries()
            .iter()
            .filter(|e| e.date == date)
            .map(|e| u64::from(e.duration_minutes))
            .sum()
    }

    pub fn by_day(&self) -> BTreeMap<NaiveDate, u64> {
        let mut days = BTreeMap::new();
        for entry in self.log.entries() {
            *days.entry(entry.date).or_insert(0) += u64::from(entry.duration_minutes);
        }
        days
    }

    pub fn by_bucket(&self) -> BTreeMap<CategoryBucket, u64> {
        let mut buckets = BTreeMap::new();
        for entry in self.log.entries() {
            let bucket = entry
                .task_id
                .as_deref()
                .and_then(|id| self.tasks.find(id))
                .map(|t| CategoryBucket::Known(t.category))
                .unwrap_or(CategoryBucket::Uncategorized);
            *buckets.entry(bucket).or_insert(0) += u64::from(entry.duration_minutes);
        }
        buckets
    }

    /// Category label to minutes.
    pub fn by_category(&self) -> BTreeMap<String, u64> {
        self.by_bucket()
            .into_iter()
            .map(|(bucket, minutes)| (bucket.label().to_string(), minutes))
            .collect()
    }

    pub fn summary(&self, today: NaiveDate, exam_date: NaiveDate) -> StudyStats {
        let total_minutes = self.total_minutes();
        let (today_completed, today_total) = self.tasks.progress_on(today);
        StudyStats {
            total_minutes,
            total_hours: total_minutes / 60,
            today_minutes: self.minutes_on(today),
            by_category: self.by_category(),
            by_day: self.by_day(),
            days_until_exam: days_until(today, exam_date),
            today_completed,
            today_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{NewTask, TaskKind};
    use chrono::{DateTime, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn at(d: u32) -> DateTime<Utc> {
        date(d).and_hms_opt(20, 0, 0).unwrap().and_utc()
    }

    fn fixture() -> (TaskStore, StudyLog, String, String) {
        let mut tasks = TaskStore::new();
        let tech = tasks
            .create(NewTask::manual(date(10), "Networks", Category::Technology, TaskKind::InputStudy, 30), at(10))
            .unwrap()
            .id
            .clone();
        let strat = tasks
            .create(NewTask::manual(date(10), "Strategy", Category::Strategy, TaskKind::InputStudy, 30), at(10))
            .unwrap()
            .id
            .clone();
        let mut log = StudyLog::new();
        log.record(Some(tech.clone()), 20, date(9), at(9));
        log.record(Some(tech.clone()), 25, date(10), at(10));
        log.record(Some(strat.clone()), 15, date(10), at(10));
        (tasks, log, tech, strat)
    }

    #[test]
    fn totals_and_today() {
        let (tasks, log, _, _) = fixture();
        let stats = StatsAggregator::new(&tasks, &log);
        assert_eq!(stats.total_minutes(), 60);
        assert_eq!(stats.minutes_on(date(10)), 40);
        assert_eq!(stats.minutes_on(date(11)), 0);
    }

    #[test]
    fn by_category_sums_resolved_tasks() {
        let (tasks, log, _, _) = fixture();
        let by_cat = StatsAggregator::new(&tasks, &log).by_category();
        assert_eq!(by_cat.get("technology"), Some(&45));
        assert_eq!(by_cat.get("strategy"), Some(&15));
        assert!(!by_cat.contains_key(UNCATEGORIZED));
    }

    #[test]
    fn deleted_task_minutes_go_to_uncategorized() {
        let (mut tasks, mut log, _, strat) = fixture();
        tasks.delete(&strat).unwrap();
        log.record(None, 5, date(10), at(10));

        let by_cat = StatsAggregator::new(&tasks, &log).by_category();
        assert_eq!(by_cat.get(UNCATEGORIZED), Some(&20));
        assert_eq!(by_cat.get("technology"), Some(&45));
    }

    #[test]
    fn summary_includes_countdown_and_progress() {
        let (mut tasks, log, tech, _) = fixture();
        tasks.toggle_status(&tech).unwrap();

        let summary = StatsAggregator::new(&tasks, &log).summary(date(10), date(20));
        assert_eq!(summary.total_minutes, 60);
        assert_eq!(summary.total_hours, 1);
        assert_eq!(summary.today_minutes, 40);
        assert_eq!(summary.days_until_exam, 10);
        assert_eq!((summary.today_completed, summary.today_total), (1, 2));
        assert_eq!(summary.by_day.get(&date(9)), Some(&20));
    }

    #[test]
    fn empty_log_yields_zeroes() {
        let tasks = TaskStore::new();
        let log = StudyLog::new();
        let summary = StatsAggregator::new(&tasks, &log).summary(date(25), date(20));
        assert_eq!(summary.total_minutes, 0);
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.days_until_exam, 0);
    }
}
