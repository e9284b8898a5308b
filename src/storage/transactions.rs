//! Transaction repository backed by the `transactions` table

use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::database::Database;
use super::observe::{Subscription, Table};
use crate::error::PocketError;
use crate::models::transaction::{date_to_millis, millis_to_date};
use crate::models::{CategoryId, Money, MonthPeriod, Transaction, TransactionId, TransactionType};

const COLUMNS: &str = "id, amount, type, category_id, date, note, currency_id";

/// Repository for transaction persistence
pub struct TransactionRepository {
    db: Database,
}

impl TransactionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a transaction, returning the assigned id
    ///
    /// Any id already set on `txn` is ignored.
    pub fn insert(&self, txn: &Transaction) -> Result<TransactionId, PocketError> {
        self.db
            .write(&[Table::Transactions], |tx| insert_with(tx, txn))
    }

    /// Update every field of the row with `txn.id`; false if no such row
    pub fn update(&self, txn: &Transaction) -> Result<bool, PocketError> {
        self.db.write(&[Table::Transactions], |tx| {
            let changed = tx.execute(
                "UPDATE transactions
                 SET amount = ?1, type = ?2, category_id = ?3, date = ?4, note = ?5, currency_id = ?6
                 WHERE id = ?7",
                params![
                    txn.amount,
                    txn.transaction_type,
                    txn.category_id,
                    date_to_millis(&txn.date),
                    txn.note,
                    txn.currency_id,
                    txn.id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a transaction; false if no such row
    pub fn delete(&self, id: TransactionId) -> Result<bool, PocketError> {
        self.db.write(&[Table::Transactions], |tx| {
            Ok(tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])? > 0)
        })
    }

    /// Delete every transaction, returning how many were removed
    pub fn delete_all(&self) -> Result<usize, PocketError> {
        self.db.write(&[Table::Transactions], |tx| {
            Ok(tx.execute("DELETE FROM transactions", [])?)
        })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, PocketError> {
        select_by_id(&*self.db.conn()?, id)
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, PocketError> {
        select_all(&*self.db.conn()?)
    }

    /// Transactions dated inside `period`, newest first
    pub fn get_in_period(&self, period: MonthPeriod) -> Result<Vec<Transaction>, PocketError> {
        let (start, end) = period_bounds(period);
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE date >= ?1 AND date < ?2 ORDER BY date DESC, id DESC",
            COLUMNS
        ))?;
        let rows = stmt.query_map(params![start, end], row_to_transaction)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Sum of every EXPENSE amount ever recorded in `category_id`
    pub fn expense_total_for_category(&self, category_id: CategoryId) -> Result<Money, PocketError> {
        let conn = self.db.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE category_id = ?1 AND type = ?2",
            params![category_id, TransactionType::Expense],
            |row| row.get(0),
        )?;
        Ok(Money::from_minor(total))
    }

    /// Number of stored transactions
    pub fn count(&self) -> Result<usize, PocketError> {
        let conn = self.db.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Observe the full list, newest first
    pub fn observe_all<F>(&self, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Vec<Transaction>) + Send + Sync + 'static,
    {
        self.db.observe(Table::Transactions, select_all, callback)
    }

    /// Observe one transaction; `None` once it is deleted
    pub fn observe_by_id<F>(&self, id: TransactionId, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Option<Transaction>) + Send + Sync + 'static,
    {
        self.db
            .observe(Table::Transactions, move |conn| select_by_id(conn, id), callback)
    }
}

pub(crate) fn insert_with(conn: &Connection, txn: &Transaction) -> Result<TransactionId, PocketError> {
    conn.execute(
        "INSERT INTO transactions (amount, type, category_id, date, note, currency_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            txn.amount,
            txn.transaction_type,
            txn.category_id,
            date_to_millis(&txn.date),
            txn.note,
            txn.currency_id,
        ],
    )?;
    Ok(TransactionId::new(conn.last_insert_rowid()))
}

pub(crate) fn select_all(conn: &Connection) -> Result<Vec<Transaction>, PocketError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions ORDER BY date DESC, id DESC",
        COLUMNS
    ))?;
    let rows = stmt.query_map([], row_to_transaction)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn select_by_id(conn: &Connection, id: TransactionId) -> Result<Option<Transaction>, PocketError> {
    Ok(conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id = ?1", COLUMNS),
            params![id],
            row_to_transaction,
        )
        .optional()?)
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let millis: i64 = row.get(4)?;
    let date: NaiveDateTime =
        millis_to_date(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(4, millis))?;

    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        transaction_type: row.get(2)?,
        category_id: row.get(3)?,
        date,
        note: row.get(5)?,
        currency_id: row.get(6)?,
    })
}

/// Half-open `[start, end)` epoch-millisecond range of a month
fn period_bounds(period: MonthPeriod) -> (i64, i64) {
    let start = period.start_date().and_time(NaiveTime::default());
    let end = period.next().start_date().and_time(NaiveTime::default());
    (date_to_millis(&start), date_to_millis(&end))
}
