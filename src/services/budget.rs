//! Budget service
//!
//! One budget per expense category and month. The duplicate check happens
//! here, before anything reaches the store.

use crate::error::{PocketError, PocketResult};
use crate::models::{Budget, BudgetId, CategoryId, Money, MonthPeriod, TransactionType};
use crate::reports::BudgetProgressReport;
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget for an expense category in `period`
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive amount or a missing/income category,
    /// `Duplicate` if the category already has a budget for that month.
    pub fn create(
        &self,
        category_id: CategoryId,
        amount: Money,
        period: MonthPeriod,
    ) -> PocketResult<Budget> {
        let mut budget = Budget::new(category_id, amount, period);
        budget
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| PocketError::Validation("Select a valid category".into()))?;

        if category.category_type != TransactionType::Expense {
            return Err(PocketError::Validation(format!(
                "Budgets can only be set for expense categories; '{}' is an income category",
                category.name
            )));
        }

        if self
            .storage
            .budgets
            .get_for_category_period(category_id, period)?
            .is_some()
        {
            return Err(PocketError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} for {}", category.name, period.long_name()),
            });
        }

        budget.id = self.storage.budgets.insert(&budget)?;
        self.storage.log_create(&budget)?;

        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> PocketResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Budgets covering `period`, or all budgets
    pub fn list(&self, period: Option<MonthPeriod>) -> PocketResult<Vec<Budget>> {
        match period {
            Some(period) => self.storage.budgets.get_for_period(period),
            None => self.storage.budgets.get_all(),
        }
    }

    /// Change the limit of an existing budget
    pub fn update_amount(&self, id: BudgetId, amount: Money) -> PocketResult<Budget> {
        let before = self
            .get(id)?
            .ok_or_else(|| PocketError::budget_not_found(id.to_string()))?;

        let mut budget = before.clone();
        budget.set_amount(amount);
        budget
            .validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        if budget != before {
            self.storage.budgets.update(&budget)?;
            self.storage.log_update(&before, &budget)?;
        }

        Ok(budget)
    }

    /// Delete a budget, returning what was removed
    pub fn delete(&self, id: BudgetId) -> PocketResult<Budget> {
        let budget = self
            .get(id)?
            .ok_or_else(|| PocketError::budget_not_found(id.to_string()))?;

        self.storage.budgets.delete(id)?;
        self.storage.log_delete(&budget)?;

        Ok(budget)
    }

    /// Progress of the budgets covering `period`, or of all budgets
    pub fn progress(&self, period: Option<MonthPeriod>) -> PocketResult<BudgetProgressReport> {
        BudgetProgressReport::generate(self.storage, period)
    }
}
