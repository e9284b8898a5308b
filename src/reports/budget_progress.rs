//! Budget progress
//!
//! For each budget: how much was spent in its category during the budget's
//! own month, and what share of the limit that is.

use std::collections::HashMap;

use crate::error::PocketResult;
use crate::models::category::fallback_name;
use crate::models::{Budget, Category, CategoryId, Money, MonthPeriod, Transaction};
use crate::storage::Storage;

/// Progress of one budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub budget: Budget,
    /// Category name, or `Category <id>` if the category is gone
    pub category_name: String,
    /// Expenses in the budget's category and month
    pub spent: Money,
    /// Whole percent of the limit spent, clamped to 0..=100
    pub percent: u8,
}

impl BudgetProgress {
    /// Compute progress for `budget` from a transaction snapshot
    pub fn compute(budget: &Budget, category_name: String, transactions: &[Transaction]) -> Self {
        let spent = spent_in_budget_period(budget, transactions);

        Self {
            budget: budget.clone(),
            category_name,
            spent,
            percent: progress_percent(spent, budget.amount),
        }
    }

    /// Limit minus spent; negative once exceeded
    pub fn remaining(&self) -> Money {
        self.budget.amount - self.spent
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent >= self.budget.amount
    }
}

/// Whole percent of `limit` that `spent` represents, clamped to 0..=100
///
/// A non-positive limit yields 0.
pub fn progress_percent(spent: Money, limit: Money) -> u8 {
    if !limit.is_positive() {
        return 0;
    }
    let percent = spent.minor().saturating_mul(100) / limit.minor();
    percent.clamp(0, 100) as u8
}

/// EXPENSE total in the budget's category during the budget's month
pub fn spent_in_budget_period(budget: &Budget, transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category_id == budget.category_id)
        .filter(|t| {
            budget
                .period()
                .map_or(false, |period| t.in_period(period))
        })
        .map(|t| t.amount)
        .sum()
}

/// Progress for every budget, in the order given
pub fn budget_progress(
    budgets: &[Budget],
    categories: &[Category],
    transactions: &[Transaction],
) -> Vec<BudgetProgress> {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    budgets
        .iter()
        .map(|budget| {
            let name = names
                .get(&budget.category_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| fallback_name(budget.category_id));
            BudgetProgress::compute(budget, name, transactions)
        })
        .collect()
}

/// Budget progress for one month, or for every budget
#[derive(Debug, Clone)]
pub struct BudgetProgressReport {
    pub period: Option<MonthPeriod>,
    pub rows: Vec<BudgetProgress>,
}

impl BudgetProgressReport {
    /// Load the current snapshots from storage and compute progress
    pub fn generate(storage: &Storage, period: Option<MonthPeriod>) -> PocketResult<Self> {
        let budgets = match period {
            Some(period) => storage.budgets.get_for_period(period)?,
            None => storage.budgets.get_all()?,
        };
        let categories = storage.categories.get_all()?;
        let transactions = storage.transactions.get_all()?;

        Ok(Self {
            period,
            rows: budget_progress(&budgets, &categories, &transactions),
        })
    }

    pub fn total_budgeted(&self) -> Money {
        self.rows.iter().map(|r| r.budget.amount).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.rows.iter().map(|r| r.spent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrencyId, TransactionType};
    use chrono::NaiveDate;

    fn march() -> MonthPeriod {
        MonthPeriod::new(2025, 3).unwrap()
    }

    fn txn(
        cents: i64,
        category: i64,
        transaction_type: TransactionType,
        (y, m, d): (i32, u32, u32),
    ) -> Transaction {
        Transaction::new(
            Money::from_minor(cents),
            transaction_type,
            CategoryId::new(category),
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            CurrencyId::new(1),
        )
    }

    fn food() -> Category {
        Category {
            id: CategoryId::new(2),
            ..Category::new("Food", TransactionType::Expense)
        }
    }

    #[test]
    fn test_progress_percent_bounds() {
        assert_eq!(progress_percent(Money::zero(), Money::from_minor(10000)), 0);
        assert_eq!(progress_percent(Money::from_minor(8500), Money::from_minor(10000)), 85);
        assert_eq!(progress_percent(Money::from_minor(25000), Money::from_minor(10000)), 100);
        assert_eq!(progress_percent(Money::from_minor(500), Money::zero()), 0);
        assert_eq!(progress_percent(Money::from_minor(-500), Money::from_minor(100)), 0);
        assert_eq!(progress_percent(Money::from_minor(3333), Money::from_minor(10000)), 33);
    }

    #[test]
    fn test_spent_counts_only_matching_expenses_in_budget_month() {
        let budget = Budget::new(CategoryId::new(2), Money::from_minor(10000), march());
        let transactions = vec![
            txn(3000, 2, TransactionType::Expense, (2025, 3, 1)),
            txn(2000, 2, TransactionType::Expense, (2025, 3, 31)),
            txn(9000, 2, TransactionType::Expense, (2025, 4, 1)),
            txn(9000, 2, TransactionType::Expense, (2024, 3, 10)),
            txn(9000, 3, TransactionType::Expense, (2025, 3, 10)),
            txn(9000, 2, TransactionType::Income, (2025, 3, 10)),
        ];

        let progress = BudgetProgress::compute(&budget, "Food".into(), &transactions);
        assert_eq!(progress.spent.minor(), 5000);
        assert_eq!(progress.percent, 50);
        assert_eq!(progress.remaining().minor(), 5000);
        assert!(!progress.is_exceeded());
    }

    #[test]
    fn test_missing_category_uses_fallback_name() {
        let budgets = vec![
            Budget::new(CategoryId::new(2), Money::from_minor(10000), march()),
            Budget::new(CategoryId::new(77), Money::from_minor(10000), march()),
        ];

        let rows = budget_progress(&budgets, &[food()], &[]);
        assert_eq!(rows[0].category_name, "Food");
        assert_eq!(rows[1].category_name, "Category 77");
        assert!(rows.iter().all(|r| r.percent == 0));
    }

    #[test]
    fn test_generate_report_for_period() {
        let storage = Storage::in_memory().unwrap();
        let food_id = storage.categories.insert(&food()).unwrap();
        storage
            .budgets
            .insert(&Budget::new(food_id, Money::from_minor(10000), march()))
            .unwrap();
        storage
            .budgets
            .insert(&Budget::new(food_id, Money::from_minor(5000), march().next()))
            .unwrap();
        storage
            .transactions
            .insert(&txn(12000, food_id.get(), TransactionType::Expense, (2025, 3, 5)))
            .unwrap();

        let report = BudgetProgressReport::generate(&storage, Some(march())).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].percent, 100);
        assert!(report.rows[0].is_exceeded());
        assert_eq!(report.total_spent().minor(), 12000);

        let all = BudgetProgressReport::generate(&storage, None).unwrap();
        assert_eq!(all.rows.len(), 2);
        assert_eq!(all.total_budgeted().minor(), 15000);
    }
}
