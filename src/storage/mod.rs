//! Storage layer for Pocket
//!
//! One SQLite database holds the four tables. Each table has a repository;
//! [`Storage`] composes them and adds the operations that span tables
//! (seeding, clearing) and audit logging.

pub mod budget;
pub mod categories;
pub mod currencies;
pub mod database;
pub mod file_io;
pub mod observe;
pub mod schema;
pub mod transactions;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use currencies::CurrencyRepository;
pub use database::Database;
pub use file_io::{write_atomic, write_json_atomic};
pub use observe::{Subscription, Table};
pub use transactions::TransactionRepository;

use crate::audit::{AuditEntry, AuditLogger, Audited, Operation};
use crate::config::paths::PocketPaths;
use crate::config::settings::Settings;
use crate::error::PocketError;
use crate::models::{Category, Currency, DefaultCategory};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    db: Database,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub currencies: CurrencyRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open the database under `paths`, creating directories as needed
    pub fn open(paths: &PocketPaths, settings: &Settings) -> Result<Self, PocketError> {
        paths.ensure_directories()?;

        let db = Database::open(paths.database_file())?;
        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));

        Ok(Self::from_database(db, audit))
    }

    /// In-memory storage without an audit log
    pub fn in_memory() -> Result<Self, PocketError> {
        Ok(Self::from_database(Database::open_in_memory()?, None))
    }

    fn from_database(db: Database, audit: Option<AuditLogger>) -> Self {
        Self {
            transactions: TransactionRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            budgets: BudgetRepository::new(db.clone()),
            currencies: CurrencyRepository::new(db.clone()),
            db,
            audit,
        }
    }

    /// The shared database handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The audit logger, if auditing is enabled
    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Insert the default categories if the table is empty
    ///
    /// Returns how many were inserted; zero on every call after the first.
    pub fn initialize_categories(&self) -> Result<usize, PocketError> {
        if self.categories.count()? > 0 {
            return Ok(0);
        }

        let inserted = self.db.write(&[Table::Categories], |tx| {
            if categories::count_with(tx)? > 0 {
                return Ok(Vec::new());
            }
            DefaultCategory::all()
                .iter()
                .map(|d| {
                    let mut category = d.to_category();
                    category.id = categories::insert_with(tx, &category)?;
                    Ok(category)
                })
                .collect::<Result<Vec<Category>, PocketError>>()
        })?;

        if !inserted.is_empty() {
            tracing::info!(count = inserted.len(), "seeded default categories");
            for category in &inserted {
                self.log_create(category)?;
            }
        }

        Ok(inserted.len())
    }

    /// Return the default currency, inserting `code` as default if none is set
    pub fn ensure_default_currency(&self, code: &str) -> Result<Currency, PocketError> {
        if let Some(existing) = self.currencies.get_default()? {
            return Ok(existing);
        }

        let currency = self.currencies.set_default(code)?;
        tracing::info!(code = %currency.code, "set initial default currency");
        self.log_create(&currency)?;
        Ok(currency)
    }

    /// First-run seeding: default categories and default currency
    pub fn bootstrap(&self, settings: &Settings) -> Result<(), PocketError> {
        self.initialize_categories()?;
        self.ensure_default_currency(&settings.default_currency_code)?;
        Ok(())
    }

    /// Delete every row of every table in one transaction
    ///
    /// Returns the number of rows removed.
    pub fn clear_all(&self) -> Result<usize, PocketError> {
        let removed = self.db.write(Table::all(), |tx| clear_tables(tx))?;

        tracing::info!(rows = removed, "cleared all data");
        self.log_bulk(Operation::Clear, format!("removed {} rows", removed))?;
        Ok(removed)
    }

    /// Record a create in the audit log (no-op when auditing is off)
    pub fn log_create<T: Audited>(&self, record: &T) -> Result<(), PocketError> {
        self.log_entry(|| AuditEntry::created(record))
    }

    pub fn log_update<T: Audited>(&self, before: &T, after: &T) -> Result<(), PocketError> {
        self.log_entry(|| AuditEntry::updated(before, after))
    }

    pub fn log_delete<T: Audited>(&self, record: &T) -> Result<(), PocketError> {
        self.log_entry(|| AuditEntry::deleted(record))
    }

    pub fn log_bulk(&self, operation: Operation, summary: String) -> Result<(), PocketError> {
        self.log_entry(|| AuditEntry::bulk(operation, summary))
    }

    fn log_entry<F: FnOnce() -> AuditEntry>(&self, build: F) -> Result<(), PocketError> {
        match &self.audit {
            Some(logger) => logger.log(&build()),
            None => Ok(()),
        }
    }
}

/// Empty all four tables on an open transaction
pub(crate) fn clear_tables(conn: &rusqlite::Connection) -> Result<usize, PocketError> {
    let mut removed = 0;
    for table in Table::all() {
        removed += conn.execute(&format!("DELETE FROM {}", table.name()), [])?;
    }
    Ok(removed)
}
