//! Daily schedule of the reminder jobs
//!
//! There is no scheduler daemon; a host (cron, systemd timer) runs
//! `pocket remind run`. This module only describes when each job is due.

use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::config::settings::ReminderSettings;
use crate::error::{PocketError, PocketResult};

pub const BUDGET_REMINDER_JOB: &str = "daily_budget_reminder";
pub const EXPENSE_REMINDER_JOB: &str = "daily_expense_reminder";

/// What to do when a job with the same unique name is already scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingJobPolicy {
    /// Leave the existing schedule untouched
    Keep,
    Replace,
}

impl fmt::Display for ExistingJobPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// A job that runs once a day at a fixed local hour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSchedule {
    pub unique_name: &'static str,
    pub time: NaiveTime,
    pub period: Duration,
    pub policy: ExistingJobPolicy,
}

impl JobSchedule {
    pub fn daily(unique_name: &'static str, hour: u32) -> PocketResult<Self> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(|| {
            PocketError::Config(format!(
                "Reminder hour for {} must be 0-23, got {}",
                unique_name, hour
            ))
        })?;

        Ok(Self {
            unique_name,
            time,
            period: Duration::days(1),
            policy: ExistingJobPolicy::Keep,
        })
    }

    /// First run strictly after `now`
    pub fn next_run(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time);
        if today > now {
            today
        } else {
            today + self.period
        }
    }

    /// Delay from `now` until the next run
    pub fn initial_delay(&self, now: NaiveDateTime) -> Duration {
        self.next_run(now) - now
    }

    /// Schedule line as printed by `remind schedule`
    pub fn describe(&self, now: NaiveDateTime) -> String {
        let delay = self.initial_delay(now);
        format!(
            "{:<24} daily at {}  next: {} (in {}h {:02}m)  existing: {}",
            self.unique_name,
            self.time.format("%H:%M"),
            self.next_run(now).format("%Y-%m-%d %H:%M"),
            delay.num_hours(),
            delay.num_minutes() % 60,
            self.policy
        )
    }
}

/// Both reminder jobs, budget check first
pub fn default_schedules(settings: &ReminderSettings) -> PocketResult<Vec<JobSchedule>> {
    Ok(vec![
        JobSchedule::daily(BUDGET_REMINDER_JOB, settings.budget_check_hour)?,
        JobSchedule::daily(EXPENSE_REMINDER_JOB, settings.expense_reminder_hour)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_default_schedules() {
        let schedules = default_schedules(&ReminderSettings::default()).unwrap();
        assert_eq!(schedules[0].unique_name, "daily_budget_reminder");
        assert_eq!(schedules[0].time, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(schedules[1].unique_name, "daily_expense_reminder");
        assert_eq!(schedules[1].time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert!(schedules.iter().all(|s| s.policy == ExistingJobPolicy::Keep));
        assert!(schedules.iter().all(|s| s.period == Duration::days(1)));
    }

    #[test]
    fn test_next_run_later_today() {
        let schedule = JobSchedule::daily(BUDGET_REMINDER_JOB, 20).unwrap();
        assert_eq!(schedule.next_run(at(9, 30)), at(20, 0));
        assert_eq!(schedule.initial_delay(at(9, 30)), Duration::minutes(630));
    }

    #[test]
    fn test_next_run_rolls_over_month() {
        let schedule = JobSchedule::daily(EXPENSE_REMINDER_JOB, 18).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        assert_eq!(schedule.next_run(at(18, 0)), expected);
        assert_eq!(schedule.next_run(at(23, 59)), expected);
    }

    #[test]
    fn test_describe_includes_delay() {
        let schedule = JobSchedule::daily(BUDGET_REMINDER_JOB, 20).unwrap();
        assert_eq!(
            schedule.describe(at(9, 30)),
            "daily_budget_reminder    daily at 20:00  next: 2025-03-31 20:00 (in 10h 30m)  existing: keep"
        );

        let late = JobSchedule::daily(EXPENSE_REMINDER_JOB, 18).unwrap();
        assert!(late.describe(at(23, 59)).contains("(in 18h 01m)"));
    }

    #[test]
    fn test_invalid_hour() {
        let err = JobSchedule::daily(BUDGET_REMINDER_JOB, 24).unwrap_err();
        assert!(matches!(err, PocketError::Config(_)));
    }
}
