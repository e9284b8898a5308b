//! Transaction model
//!
//! An income or expense entry against one category, in one currency.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, CurrencyId, TransactionId};
use super::money::Money;
use super::period::MonthPeriod;

/// Direction of a transaction; categories carry the same tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// Stored and exported representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Income, Self::Expense]
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(TransactionTypeParseError(s.to_string())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Unknown transaction type string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTypeParseError(pub String);

impl fmt::Display for TransactionTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown transaction type '{}' (expected INCOME or EXPENSE)", self.0)
    }
}

impl std::error::Error for TransactionTypeParseError {}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Row id; zero until the store assigns one
    pub id: TransactionId,

    /// Always positive; the direction is `transaction_type`
    pub amount: Money,

    pub transaction_type: TransactionType,

    pub category_id: CategoryId,

    /// Local wall-clock date and time
    pub date: NaiveDateTime,

    pub note: Option<String>,

    pub currency_id: CurrencyId,
}

impl Transaction {
    /// Create a new, not yet stored transaction
    pub fn new(
        amount: Money,
        transaction_type: TransactionType,
        category_id: CategoryId,
        date: NaiveDateTime,
        currency_id: CurrencyId,
    ) -> Self {
        Self {
            id: TransactionId::default(),
            amount,
            transaction_type,
            category_id,
            date,
            note: None,
            currency_id,
        }
    }

    /// Builder-style note setter
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Whether this transaction falls in the given calendar month
    pub fn in_period(&self, period: MonthPeriod) -> bool {
        period.contains(self.date.date())
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount);
        }

        if !self.category_id.is_assigned() {
            return Err(TransactionValidationError::MissingCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.transaction_type,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount,
    MissingCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Enter a valid amount (must be greater than zero)"),
            Self::MissingCategory => write!(f, "Select a valid category"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Epoch milliseconds for a local wall-clock timestamp, as stored and exported
///
/// Ambiguous local times (DST fall-back) take the earlier instant. A time
/// skipped by a DST gap is read as UTC.
pub fn date_to_millis(date: &NaiveDateTime) -> i64 {
    match Local.from_local_datetime(date).earliest() {
        Some(local) => local.timestamp_millis(),
        None => date.and_utc().timestamp_millis(),
    }
}

/// Inverse of [`date_to_millis`] in the local zone; `None` when out of chrono's range
pub fn millis_to_date(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Parse "YYYY-MM-DD" or "YYYY-MM-DD HH:MM" as typed on the command line
pub fn parse_date_input(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
