//! Shared SQLite handle
//!
//! One [`Database`] wraps the connection behind a mutex and owns the change
//! notifier. Repositories hold cheap clones of it. Writes go through
//! [`Database::write`], which commits and releases the connection before
//! notifying observers of the touched tables.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use super::observe::{ChangeNotifier, Subscription, Table};
use super::schema;
use crate::error::PocketError;

/// Connection plus change notifier, shared by all repositories
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    notifier: Arc<ChangeNotifier>,
}

impl Database {
    /// Open (or create) the database file and run pending migrations
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PocketError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            PocketError::Database(format!("Failed to open {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Fresh in-memory database (tests and dry runs)
    pub fn open_in_memory() -> Result<Self, PocketError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, PocketError> {
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            notifier: Arc::new(ChangeNotifier::new()),
        })
    }

    /// Lock the connection for a read
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, PocketError> {
        lock(&self.conn)
    }

    /// Run `f` in one SQL transaction, then notify observers of `tables`
    ///
    /// Nothing is notified if `f` or the commit fails; the transaction is
    /// rolled back when dropped uncommitted.
    pub fn write<T, F>(&self, tables: &[Table], f: F) -> Result<T, PocketError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, PocketError>,
    {
        let result = {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            value
        };

        self.notifier.notify_all(tables);
        Ok(result)
    }

    /// Run `query` now and after every committed write to `table`, handing
    /// each result to `callback`
    ///
    /// A failed re-query is logged and skipped; the subscription stays live.
    pub fn observe<T, Q, C>(
        &self,
        table: Table,
        query: Q,
        callback: C,
    ) -> Result<Subscription, PocketError>
    where
        Q: Fn(&Connection) -> Result<T, PocketError> + Send + Sync + 'static,
        C: Fn(T) + Send + Sync + 'static,
    {
        let initial = {
            let conn = self.conn()?;
            query(&conn)?
        };
        callback(initial);

        let weak_conn = Arc::downgrade(&self.conn);
        let listener = move || {
            let Some(conn) = weak_conn.upgrade() else {
                return;
            };
            let result = match lock(&conn) {
                Ok(guard) => query(&guard),
                Err(e) => Err(e),
            };
            match result {
                Ok(value) => callback(value),
                Err(e) => tracing::warn!(table = %table, error = %e, "observer query failed"),
            }
        };

        Ok(self.notifier.register(table, Arc::new(listener)))
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.notifier.listener_count()
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, PocketError> {
    conn.lock()
        .map_err(|e| PocketError::Storage(format!("Failed to acquire connection lock: {}", e)))
}
