//! Dashboard summaries and chart data
//!
//! Everything here is recomputed from a transaction snapshot; nothing is
//! cached between calls.

use std::collections::HashMap;

use crate::error::PocketResult;
use crate::models::category::fallback_name;
use crate::models::{Category, CategoryId, Money, MonthPeriod, Transaction, TransactionType};
use crate::storage::Storage;

/// Income, expense and balance for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub period: MonthPeriod,
    pub income: Money,
    pub expense: Money,
    /// `income - expense`
    pub balance: Money,
}

impl DashboardSummary {
    /// Sum the transactions dated in `period` (month and year)
    pub fn compute(transactions: &[Transaction], period: MonthPeriod) -> Self {
        let (income, expense) = totals(transactions.iter().filter(|t| t.in_period(period)));
        Self {
            period,
            income,
            expense,
            balance: income - expense,
        }
    }

    /// Income vs expense as two chart slices
    pub fn pie_entries(&self) -> Vec<ChartEntry> {
        vec![
            ChartEntry::new("Income", self.income),
            ChartEntry::new("Expense", self.expense),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }
}

/// Totals for a whole year plus its twelve monthly summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    pub months: Vec<DashboardSummary>,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

impl YearSummary {
    pub fn compute(transactions: &[Transaction], year: i32) -> Self {
        let (income, expense) = totals(
            transactions
                .iter()
                .filter(|t| MonthPeriod::from_date(t.date.date()).year == year),
        );

        Self {
            year,
            months: monthly_series(transactions, year),
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// One summary per month of `year`, January first
pub fn monthly_series(transactions: &[Transaction], year: i32) -> Vec<DashboardSummary> {
    MonthPeriod::months_of(year)
        .map(|period| DashboardSummary::compute(transactions, period))
        .collect()
}

/// A labelled value for charting
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntry {
    pub label: String,
    pub value: f64,
}

impl ChartEntry {
    pub fn new(label: impl Into<String>, amount: Money) -> Self {
        Self {
            label: label.into(),
            value: amount.to_decimal(),
        }
    }
}

/// Per-category totals of one transaction type in `period`, largest first
///
/// Transactions whose category no longer exists are grouped under
/// `Category <id>`.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    period: MonthPeriod,
    transaction_type: TransactionType,
) -> Vec<ChartEntry> {
    let mut sums: HashMap<CategoryId, Money> = HashMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type && t.in_period(period))
    {
        *sums.entry(txn.category_id).or_default() += txn.amount;
    }

    let mut rows: Vec<(CategoryId, Money)> = sums.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    rows.into_iter()
        .map(|(id, amount)| {
            let label = categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| fallback_name(id));
            ChartEntry::new(label, amount)
        })
        .collect()
}

/// Month summary plus both category breakdowns
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub expense_by_category: Vec<ChartEntry>,
    pub income_by_category: Vec<ChartEntry>,
}

impl Dashboard {
    /// Build the dashboard for `period` from current storage snapshots
    pub fn generate(storage: &Storage, period: MonthPeriod) -> PocketResult<Self> {
        let transactions = storage.transactions.get_in_period(period)?;
        let categories = storage.categories.get_all()?;
        Ok(Self::compute(&transactions, &categories, period))
    }

    pub fn compute(transactions: &[Transaction], categories: &[Category], period: MonthPeriod) -> Self {
        Self {
            summary: DashboardSummary::compute(transactions, period),
            expense_by_category: category_breakdown(
                transactions,
                categories,
                period,
                TransactionType::Expense,
            ),
            income_by_category: category_breakdown(
                transactions,
                categories,
                period,
                TransactionType::Income,
            ),
        }
    }
}

fn totals<'a, I>(transactions: I) -> (Money, Money)
where
    I: Iterator<Item = &'a Transaction>,
{
    transactions.fold((Money::zero(), Money::zero()), |(income, expense), t| {
        match t.transaction_type {
            TransactionType::Income => (income + t.amount, expense),
            TransactionType::Expense => (income, expense + t.amount),
        }
    })
}
