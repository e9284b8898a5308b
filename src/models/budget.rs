//! Budget model
//!
//! A spending limit for one category in one calendar month.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::period::MonthPeriod;

/// A monthly budget for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Row id; zero until the store assigns one
    pub id: BudgetId,

    pub category_id: CategoryId,

    /// Spending limit for the month
    pub amount: Money,

    /// 1-12
    pub month: u32,

    pub year: i32,
}

impl Budget {
    /// Create a new, not yet stored budget for `period`
    pub fn new(category_id: CategoryId, amount: Money, period: MonthPeriod) -> Self {
        Self {
            id: BudgetId::default(),
            category_id,
            amount,
            month: period.month,
            year: period.year,
        }
    }

    /// The month this budget covers; `None` if the stored month is invalid
    pub fn period(&self) -> Option<MonthPeriod> {
        MonthPeriod::new(self.year, self.month)
    }

    /// Whether this budget covers `period`
    pub fn covers(&self, period: MonthPeriod) -> bool {
        self.month == period.month && self.year == period.year
    }

    /// Replace the limit
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount);
        }

        if !(1..=12).contains(&self.month) {
            return Err(BudgetValidationError::InvalidMonth(self.month));
        }

        if !self.category_id.is_assigned() {
            return Err(BudgetValidationError::MissingCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}: {}", self.year, self.month, self.amount)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount,
    InvalidMonth(u32),
    MissingCategory,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Enter a valid amount (must be greater than zero)"),
            Self::InvalidMonth(m) => write!(f, "Invalid month {} (expected 1-12)", m),
            Self::MissingCategory => write!(f, "Select a valid category"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
