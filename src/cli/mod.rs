//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod currency;
pub mod dashboard;
pub mod data;
pub mod remind;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use currency::{handle_currency_command, CurrencyCommands};
pub use dashboard::{handle_dashboard_command, DashboardArgs};
pub use data::{handle_clear, handle_export, handle_import};
pub use remind::{handle_remind_command, RemindCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDateTime};

use crate::error::{PocketError, PocketResult};
use crate::models::transaction::parse_date_input;
use crate::models::{Money, MonthPeriod};
use crate::storage::Storage;

/// Parse a positive amount such as "12.50"
pub(crate) fn parse_amount(input: &str) -> PocketResult<Money> {
    let amount = Money::parse(input).map_err(|e| {
        PocketError::Validation(format!("{}. Use a format like '12.50' or '100'", e))
    })?;

    if !amount.is_positive() {
        return Err(PocketError::Validation(
            "Enter a valid amount (must be greater than zero)".into(),
        ));
    }
    Ok(amount)
}

/// Parse "YYYY-MM", defaulting to the current month
pub(crate) fn parse_period(input: Option<&str>) -> PocketResult<MonthPeriod> {
    match input {
        Some(s) => s.parse().map_err(|e: crate::models::period::PeriodParseError| {
            PocketError::Validation(e.to_string())
        }),
        None => Ok(MonthPeriod::current()),
    }
}

/// Parse "YYYY-MM-DD" or "YYYY-MM-DD HH:MM", defaulting to now
pub(crate) fn parse_date(input: Option<&str>) -> PocketResult<NaiveDateTime> {
    match input {
        Some(s) => parse_date_input(s).ok_or_else(|| {
            PocketError::Validation(format!(
                "Invalid date format: '{}'. Use YYYY-MM-DD or 'YYYY-MM-DD HH:MM'",
                s
            ))
        }),
        None => Ok(Local::now().naive_local()),
    }
}

/// Code of the default currency for formatting, or "Unknown"
pub(crate) fn default_code(storage: &Storage) -> PocketResult<String> {
    Ok(storage
        .currencies
        .get_default()?
        .map(|c| c.code)
        .unwrap_or_else(|| "Unknown".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap().minor(), 1250);
        assert!(parse_amount("0").unwrap_err().is_validation());
        assert!(parse_amount("-5").unwrap_err().is_validation());
        assert!(parse_amount("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(
            parse_period(Some("2025-03")).unwrap(),
            MonthPeriod::new(2025, 3).unwrap()
        );
        assert!(parse_period(Some("2025-13")).unwrap_err().is_validation());
        assert_eq!(parse_period(None).unwrap(), MonthPeriod::current());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date(Some("2025-03-14 19:45")).unwrap();
        assert_eq!(date.format("%Y-%m-%d %H:%M").to_string(), "2025-03-14 19:45");
        assert!(parse_date(Some("14/03/2025")).unwrap_err().is_validation());
    }
}
