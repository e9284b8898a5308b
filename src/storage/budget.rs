//! Budget repository backed by the `budgets` table
//!
//! The store does not enforce one budget per (category, month, year); the
//! budget service checks with [`BudgetRepository::get_for_category_period`]
//! before inserting.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::database::Database;
use super::observe::{Subscription, Table};
use crate::error::PocketError;
use crate::models::{Budget, BudgetId, CategoryId, MonthPeriod};

/// Repository for budget persistence
pub struct BudgetRepository {
    db: Database,
}

impl BudgetRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a budget, returning the assigned id
    pub fn insert(&self, budget: &Budget) -> Result<BudgetId, PocketError> {
        self.db.write(&[Table::Budgets], |tx| insert_with(tx, budget))
    }

    pub fn update(&self, budget: &Budget) -> Result<bool, PocketError> {
        self.db.write(&[Table::Budgets], |tx| {
            let changed = tx.execute(
                "UPDATE budgets SET category_id = ?1, amount = ?2, month = ?3, year = ?4 WHERE id = ?5",
                params![
                    budget.category_id,
                    budget.amount,
                    budget.month,
                    budget.year,
                    budget.id
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, PocketError> {
        self.db.write(&[Table::Budgets], |tx| {
            Ok(tx.execute("DELETE FROM budgets WHERE id = ?1", params![id])? > 0)
        })
    }

    pub fn delete_all(&self) -> Result<usize, PocketError> {
        self.db
            .write(&[Table::Budgets], |tx| Ok(tx.execute("DELETE FROM budgets", [])?))
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, PocketError> {
        let conn = self.db.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, category_id, amount, month, year FROM budgets WHERE id = ?1",
                params![id],
                row_to_budget,
            )
            .optional()?)
    }

    /// All budgets, most recent period first
    pub fn get_all(&self) -> Result<Vec<Budget>, PocketError> {
        select_all(&*self.db.conn()?)
    }

    /// Budgets covering `period`
    pub fn get_for_period(&self, period: MonthPeriod) -> Result<Vec<Budget>, PocketError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, category_id, amount, month, year FROM budgets
             WHERE month = ?1 AND year = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![period.month, period.year], row_to_budget)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The budget for a category in a month, if one exists
    pub fn get_for_category_period(
        &self,
        category_id: CategoryId,
        period: MonthPeriod,
    ) -> Result<Option<Budget>, PocketError> {
        select_for_category_period(&*self.db.conn()?, category_id, period)
    }

    pub fn observe_all<F>(&self, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Vec<Budget>) + Send + Sync + 'static,
    {
        self.db.observe(Table::Budgets, select_all, callback)
    }

    pub fn observe_for_category_period<F>(
        &self,
        category_id: CategoryId,
        period: MonthPeriod,
        callback: F,
    ) -> Result<Subscription, PocketError>
    where
        F: Fn(Option<Budget>) + Send + Sync + 'static,
    {
        self.db.observe(
            Table::Budgets,
            move |conn| select_for_category_period(conn, category_id, period),
            callback,
        )
    }
}

pub(crate) fn insert_with(conn: &Connection, budget: &Budget) -> Result<BudgetId, PocketError> {
    conn.execute(
        "INSERT INTO budgets (category_id, amount, month, year) VALUES (?1, ?2, ?3, ?4)",
        params![budget.category_id, budget.amount, budget.month, budget.year],
    )?;
    Ok(BudgetId::new(conn.last_insert_rowid()))
}

pub(crate) fn select_all(conn: &Connection) -> Result<Vec<Budget>, PocketError> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, amount, month, year FROM budgets
         ORDER BY year DESC, month DESC, id",
    )?;
    let rows = stmt.query_map([], row_to_budget)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn select_for_category_period(
    conn: &Connection,
    category_id: CategoryId,
    period: MonthPeriod,
) -> Result<Option<Budget>, PocketError> {
    Ok(conn
        .query_row(
            "SELECT id, category_id, amount, month, year FROM budgets
             WHERE category_id = ?1 AND month = ?2 AND year = ?3 ORDER BY id LIMIT 1",
            params![category_id, period.month, period.year],
            row_to_budget,
        )
        .optional()?)
}

fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        category_id: row.get(1)?,
        amount: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::sync::{Arc, Mutex};

    fn create_test_repo() -> BudgetRepository {
        BudgetRepository::new(Database::open_in_memory().unwrap())
    }

    fn march() -> MonthPeriod {
        MonthPeriod::new(2025, 3).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let repo = create_test_repo();
        let budget = Budget::new(CategoryId::new(2), Money::from_minor(10000), march());

        let id = repo.insert(&budget).unwrap();
        let stored = repo.get(id).unwrap().unwrap();
        assert_eq!(stored, Budget { id, ..budget });
    }

    #[test]
    fn test_store_allows_duplicates() {
        let repo = create_test_repo();
        let budget = Budget::new(CategoryId::new(2), Money::from_minor(10000), march());
        repo.insert(&budget).unwrap();
        repo.insert(&budget).unwrap();
        assert_eq!(repo.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_get_for_category_period() {
        let repo = create_test_repo();
        repo.insert(&Budget::new(
            CategoryId::new(2),
            Money::from_minor(10000),
            march(),
        ))
        .unwrap();

        assert!(repo
            .get_for_category_period(CategoryId::new(2), march())
            .unwrap()
            .is_some());
        assert!(repo
            .get_for_category_period(CategoryId::new(2), march().next())
            .unwrap()
            .is_none());
        assert!(repo
            .get_for_category_period(CategoryId::new(3), march())
            .unwrap()
            .is_none());
        assert_eq!(repo.get_for_period(march()).unwrap().len(), 1);
    }

    #[test]
    fn test_update_amount() {
        let repo = create_test_repo();
        let id = repo
            .insert(&Budget::new(
                CategoryId::new(2),
                Money::from_minor(10000),
                march(),
            ))
            .unwrap();

        let mut budget = repo.get(id).unwrap().unwrap();
        budget.set_amount(Money::from_minor(25000));
        assert!(repo.update(&budget).unwrap());
        assert_eq!(repo.get(id).unwrap().unwrap().amount.minor(), 25000);
    }

    #[test]
    fn test_observe_for_category_period() {
        let repo = create_test_repo();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _sub = repo
            .observe_for_category_period(CategoryId::new(2), march(), move |b| {
                s.lock().unwrap().push(b.map(|b| b.amount.minor()))
            })
            .unwrap();

        let id = repo
            .insert(&Budget::new(
                CategoryId::new(2),
                Money::from_minor(5000),
                march(),
            ))
            .unwrap();
        repo.delete(id).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![None, Some(5000), None]);
    }
}
