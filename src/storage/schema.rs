//! SQLite schema and migrations
//!
//! The schema version lives in `PRAGMA user_version`. A fresh database gets
//! the version 1 tables and is then migrated forward like any older file, so
//! both paths run the same migration code.

use rusqlite::Connection;

use crate::error::PocketError;

pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    amount      INTEGER NOT NULL,
    type        TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    date        INTEGER NOT NULL,
    note        TEXT,
    currency_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL,
    amount      INTEGER NOT NULL,
    month       INTEGER NOT NULL,
    year        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS currencies (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    code       TEXT NOT NULL,
    is_default INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
CREATE INDEX IF NOT EXISTS idx_budgets_period ON budgets(category_id, year, month);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1, as (from_version, sql)
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    "ALTER TABLE categories ADD COLUMN type TEXT NOT NULL DEFAULT 'EXPENSE';",
)];

/// Read `PRAGMA user_version`
pub fn schema_version(conn: &Connection) -> Result<i32, PocketError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), PocketError> {
    // PRAGMA does not accept bound parameters
    conn.execute_batch(&format!("PRAGMA user_version = {};", version))?;
    Ok(())
}

/// Bring the database up to [`CURRENT_VERSION`]
///
/// Each step runs in its own transaction together with the version bump, so
/// an interrupted upgrade leaves the file at the last completed version.
pub fn migrate(conn: &mut Connection) -> Result<(), PocketError> {
    let mut version = schema_version(conn)?;

    if version > CURRENT_VERSION {
        return Err(PocketError::Database(format!(
            "Database schema version {} is newer than supported version {}",
            version, CURRENT_VERSION
        )));
    }

    if version == 0 {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_V1)?;
        set_schema_version(&tx, 1)?;
        tx.commit()?;
        version = 1;
        tracing::info!("created schema version 1");
    }

    for (from, sql) in MIGRATIONS {
        if *from != version {
            continue;
        }
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        set_schema_version(&tx, from + 1)?;
        tx.commit()?;
        version = from + 1;
        tracing::info!(from = *from, to = version, "migrated database schema");
    }

    if version != CURRENT_VERSION {
        return Err(PocketError::Database(format!(
            "No migration path from schema version {}",
            version
        )));
    }

    Ok(())
}
