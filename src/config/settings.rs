//! User settings for Pocket
//!
//! Manages user preferences: currencies, reminder thresholds and schedule,
//! import behaviour and audit logging.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::PocketPaths;
use crate::error::PocketError;
use crate::storage::file_io::write_json_atomic;

/// Which expenses the budget threshold job counts against a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpendScope {
    /// Every expense ever recorded in the budget's category
    #[default]
    AllTime,
    /// Only expenses dated inside the budget's month
    BudgetPeriod,
}

/// How an import treats data already in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Insert imported rows next to the existing ones
    #[default]
    Merge,
    /// Clear every table, then insert
    Replace,
}

/// Reminder job settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// Spend percentage at which "approaching" is reported
    #[serde(default = "default_approaching_percent")]
    pub approaching_threshold_percent: u8,

    #[serde(default)]
    pub spend_scope: SpendScope,

    /// Local hour (0-23) of the daily budget check
    #[serde(default = "default_budget_check_hour")]
    pub budget_check_hour: u32,

    /// Local hour (0-23) of the daily "log your expenses" reminder
    #[serde(default = "default_expense_reminder_hour")]
    pub expense_reminder_hour: u32,
}

fn default_approaching_percent() -> u8 {
    80
}

fn default_budget_check_hour() -> u32 {
    20
}

fn default_expense_reminder_hour() -> u32 {
    18
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            approaching_threshold_percent: default_approaching_percent(),
            spend_scope: SpendScope::default(),
            budget_check_hour: default_budget_check_hour(),
            expense_reminder_hour: default_expense_reminder_hour(),
        }
    }
}

/// User settings for Pocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency seeded as default on first run
    #[serde(default = "default_currency_code")]
    pub default_currency_code: String,

    /// Currency codes offered by `currency set`, default first
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: Vec<String>,

    /// Date format preference (strftime format); see [`Settings::date_format`]
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub reminders: ReminderSettings,

    #[serde(default)]
    pub import_mode: ImportMode,

    /// Append mutations to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_code() -> String {
    "LKR".to_string()
}

fn default_supported_currencies() -> Vec<String> {
    ["LKR", "USD", "EUR", "GBP", "JPY"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency_code: default_currency_code(),
            supported_currencies: default_supported_currencies(),
            date_format: default_date_format(),
            reminders: ReminderSettings::default(),
            import_mode: ImportMode::default(),
            audit_enabled: true,
        }
    }
}

impl Settings {
    /// Whether `code` is one of the configured currencies (case-insensitive)
    pub fn supports_currency(&self, code: &str) -> bool {
        self.supported_currencies
            .iter()
            .any(|c| c.eq_ignore_ascii_case(code.trim()))
    }

    /// The configured date format, or `%Y-%m-%d` when it is not a valid
    /// strftime string
    pub fn date_format(&self) -> &str {
        let invalid = self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error));
        if invalid {
            tracing::warn!(format = %self.date_format, "invalid date_format, using default");
            DEFAULT_DATE_FORMAT
        } else {
            &self.date_format
        }
    }

    /// Load settings from disk, or create default settings if the file doesn't exist
    pub fn load_or_create(paths: &PocketPaths) -> Result<Self, PocketError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PocketError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PocketError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PocketPaths) -> Result<(), PocketError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
