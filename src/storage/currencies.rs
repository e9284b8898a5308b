//! Currency repository backed by the `currencies` table

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::database::Database;
use super::observe::{Subscription, Table};
use crate::error::PocketError;
use crate::models::currency::normalize_code;
use crate::models::{Currency, CurrencyId};

/// Repository for currency persistence
pub struct CurrencyRepository {
    db: Database,
}

impl CurrencyRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a currency, returning the assigned id
    ///
    /// Does not touch the default flag of other rows; use
    /// [`set_default`](Self::set_default) to switch the default.
    pub fn insert(&self, currency: &Currency) -> Result<CurrencyId, PocketError> {
        self.db
            .write(&[Table::Currencies], |tx| insert_with(tx, currency))
    }

    pub fn update(&self, currency: &Currency) -> Result<bool, PocketError> {
        self.db.write(&[Table::Currencies], |tx| {
            let changed = tx.execute(
                "UPDATE currencies SET code = ?1, is_default = ?2 WHERE id = ?3",
                params![currency.code, currency.is_default, currency.id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete(&self, id: CurrencyId) -> Result<bool, PocketError> {
        self.db.write(&[Table::Currencies], |tx| {
            Ok(tx.execute("DELETE FROM currencies WHERE id = ?1", params![id])? > 0)
        })
    }

    pub fn delete_all(&self) -> Result<usize, PocketError> {
        self.db
            .write(&[Table::Currencies], |tx| Ok(tx.execute("DELETE FROM currencies", [])?))
    }

    pub fn get(&self, id: CurrencyId) -> Result<Option<Currency>, PocketError> {
        let conn = self.db.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, code, is_default FROM currencies WHERE id = ?1",
                params![id],
                row_to_currency,
            )
            .optional()?)
    }

    pub fn get_all(&self) -> Result<Vec<Currency>, PocketError> {
        select_all(&*self.db.conn()?)
    }

    /// The currency flagged default, if any
    pub fn get_default(&self) -> Result<Option<Currency>, PocketError> {
        select_default(&*self.db.conn()?)
    }

    pub fn get_by_code(&self, code: &str) -> Result<Option<Currency>, PocketError> {
        select_by_code(&*self.db.conn()?, code)
    }

    /// Make `code` the only default currency
    ///
    /// Clears the old flag and sets the new one in a single transaction,
    /// reusing an existing row with the same code or inserting one.
    pub fn set_default(&self, code: &str) -> Result<Currency, PocketError> {
        let code = normalize_code(code);
        self.db.write(&[Table::Currencies], |tx| {
            tx.execute("UPDATE currencies SET is_default = 0 WHERE is_default != 0", [])?;

            let id = match select_by_code(tx, &code)? {
                Some(existing) => {
                    tx.execute(
                        "UPDATE currencies SET is_default = 1 WHERE id = ?1",
                        params![existing.id],
                    )?;
                    existing.id
                }
                None => insert_with(tx, &Currency::new(code.clone(), true))?,
            };

            Ok(Currency {
                id,
                code: code.clone(),
                is_default: true,
            })
        })
    }

    pub fn observe_all<F>(&self, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Vec<Currency>) + Send + Sync + 'static,
    {
        self.db.observe(Table::Currencies, select_all, callback)
    }

    pub fn observe_default<F>(&self, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Option<Currency>) + Send + Sync + 'static,
    {
        self.db.observe(Table::Currencies, select_default, callback)
    }
}

pub(crate) fn insert_with(conn: &Connection, currency: &Currency) -> Result<CurrencyId, PocketError> {
    conn.execute(
        "INSERT INTO currencies (code, is_default) VALUES (?1, ?2)",
        params![currency.code, currency.is_default],
    )?;
    Ok(CurrencyId::new(conn.last_insert_rowid()))
}

pub(crate) fn select_all(conn: &Connection) -> Result<Vec<Currency>, PocketError> {
    let mut stmt = conn.prepare("SELECT id, code, is_default FROM currencies ORDER BY id")?;
    let rows = stmt.query_map([], row_to_currency)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(crate) fn select_default(conn: &Connection) -> Result<Option<Currency>, PocketError> {
    Ok(conn
        .query_row(
            "SELECT id, code, is_default FROM currencies WHERE is_default != 0 ORDER BY id LIMIT 1",
            [],
            row_to_currency,
        )
        .optional()?)
}

fn select_by_code(conn: &Connection, code: &str) -> Result<Option<Currency>, PocketError> {
    Ok(conn
        .query_row(
            "SELECT id, code, is_default FROM currencies WHERE code = ?1 ORDER BY id LIMIT 1",
            params![normalize_code(code)],
            row_to_currency,
        )
        .optional()?)
}

fn row_to_currency(row: &Row<'_>) -> rusqlite::Result<Currency> {
    Ok(Currency {
        id: row.get(0)?,
        code: row.get(1)?,
        is_default: row.get(2)?,
    })
}
