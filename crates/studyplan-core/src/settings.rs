//! Plan settings stored alongside tasks and logs.
//!
//! Settings are created on first run and change only when the user saves new
//! values. Loading merges stored fields over the defaults one at a time, so a
//! single bad field does not cost the others.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Plans run up to, but not including, this date
    pub exam_date: NaiveDate,
    /// Minutes of study per day; sizes generated tasks
    pub daily_target_minutes: u32,
    /// Stored for display; generation does not use it
    pub study_days_per_week: u32,
    /// Date of first initialization
    pub start_date: NaiveDate,
}

impl Settings {
    /// Default settings, with `start_date` set to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            exam_date: NaiveDate::from_ymd_opt(2026, 4, 19).unwrap_or(today),
            daily_target_minutes: 45,
            study_days_per_week: 7,
            start_date: today,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=1440).contains(&self.daily_target_minutes) {
            return Err(ValidationError::InvalidValue {
                field: "daily_target_minutes".into(),
                message: format!("{} is not between 1 and 1440", self.daily_target_minutes),
            });
        }
        if !(1..=7).contains(&self.study_days_per_week) {
            return Err(ValidationError::InvalidValue {
                field: "study_days_per_week".into(),
                message: format!("{} is not between 1 and 7", self.study_days_per_week),
            });
        }
        Ok(())
    }

    /// Overlay the fields of a stored settings object onto `self`.
    ///
    /// Unknown keys are ignored. A field whose value does not fit its type, or
    /// falls outside the range `validate` accepts, is skipped and the current
    /// value kept.
    pub fn merge_json(&mut self, stored: &serde_json::Map<String, serde_json::Value>) {
        let Ok(serde_json::Value::Object(mut current)) = serde_json::to_value(&*self) else {
            return;
        };
        for (key, value) in stored {
            if !current.contains_key(key) {
                continue;
            }
            let mut candidate = current.clone();
            candidate.insert(key.clone(), value.clone());
            match serde_json::from_value::<Settings>(serde_json::Value::Object(candidate.clone())) {
                Ok(merged) => match merged.validate() {
                    Ok(()) => current = candidate,
                    Err(e) => tracing::warn!(field = %key, error = %e, "ignoring stored setting"),
                },
                Err(e) => tracing::warn!(field = %key, error = %e, "ignoring stored setting"),
            }
        }
        if let Ok(merged) = serde_json::from_value(serde_json::Value::Object(current)) {
            *self = merged;
        }
    }
}

/// Changes requested from the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub exam_date: Option<NaiveDate>,
    pub daily_target_minutes: Option<u32>,
    pub study_days_per_week: Option<u32>,
}

impl SettingsUpdate {
    /// `base` with the requested changes applied and validated.
    pub fn apply_to(&self, base: &Settings) -> Result<Settings, ValidationError> {
        let mut next = base.clone();
        if let Some(date) = self.exam_date {
            next.exam_date = date;
        }
        if let Some(minutes) = self.daily_target_minutes {
            next.daily_target_minutes = minutes;
        }
        if let Some(days) = self.study_days_per_week {
            next.study_days_per_week = days;
        }
        next.validate()?;
        Ok(next)
    }
}
