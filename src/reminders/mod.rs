//! Reminder jobs for Pocket
//!
//! Two daily jobs: a budget threshold check and a prompt to log expenses.
//! Jobs produce [`Notification`]s, which are rendered and handed to a
//! [`NotificationSink`].

pub mod jobs;
pub mod notification;
pub mod schedule;
pub mod sink;

pub use jobs::{classify, run_job, BudgetThresholdJob, ExpenseLogReminderJob, JobReport, ReminderJob};
pub use notification::{
    describe_channel, Notification, RenderedNotification, CHANNEL_ID, DAILY_REMINDER_KEY,
};
pub use schedule::{default_schedules, ExistingJobPolicy, JobSchedule};
pub use sink::{ConsoleSink, MemorySink, NotificationSink};
