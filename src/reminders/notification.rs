//! Notifications emitted by the reminder jobs

use serde::Serialize;
use std::fmt;

use crate::models::{CategoryId, Money};

/// Channel every reminder notification is posted to
pub const CHANNEL_ID: &str = "budget_channel";
pub const CHANNEL_NAME: &str = "Budget Notifications";
pub const CHANNEL_DESCRIPTION: &str = "Notifications for budget limits and reminders";

/// Key of the daily reminder; budget notifications are keyed by category id
pub const DAILY_REMINDER_KEY: i64 = 0;

/// What a reminder job wants to tell the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Spend reached the approaching threshold but not the limit
    Approaching {
        category_id: CategoryId,
        category: String,
        spent: Money,
        limit: Money,
    },
    /// Spend reached or passed the limit
    Exceeded {
        category_id: CategoryId,
        category: String,
        spent: Money,
        limit: Money,
    },
    DailyLogReminder,
}

impl Notification {
    /// Replacement key: a newer notification with the same key supersedes
    /// the older one
    pub fn key(&self) -> i64 {
        match self {
            Self::Approaching { category_id, .. } | Self::Exceeded { category_id, .. } => {
                category_id.get()
            }
            Self::DailyLogReminder => DAILY_REMINDER_KEY,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Approaching { .. } => "Approaching Budget Limit",
            Self::Exceeded { .. } => "Budget Exceeded",
            Self::DailyLogReminder => "Daily Expense Reminder",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::Approaching {
                category,
                spent,
                limit,
                ..
            }
            | Self::Exceeded {
                category,
                spent,
                limit,
                ..
            } => format!("{}: Spent {}, Budget {}", category, spent, limit),
            Self::DailyLogReminder => "Have you logged your expenses today?".to_string(),
        }
    }

    /// Render to the form a sink delivers
    pub fn render(&self) -> RenderedNotification {
        RenderedNotification {
            channel: CHANNEL_ID,
            key: self.key(),
            title: self.title().to_string(),
            body: self.body(),
        }
    }
}

/// One-line description of the notification channel, e.g. for `remind schedule`
pub fn describe_channel() -> String {
    format!("{} ({}): {}", CHANNEL_NAME, CHANNEL_ID, CHANNEL_DESCRIPTION)
}

/// A notification ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNotification {
    pub channel: &'static str,
    pub key: i64,
    pub title: String,
    pub body: String,
}

impl fmt::Display for RenderedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}#{}] {}: {}", self.channel, self.key, self.title, self.body)
    }
}
