//! Category repository backed by the `categories` table

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::database::Database;
use super::observe::{Subscription, Table};
use crate::error::PocketError;
use crate::models::{Category, CategoryId, TransactionType};

/// Repository for category persistence
pub struct CategoryRepository {
    db: Database,
}

impl CategoryRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a category, returning the assigned id
    pub fn insert(&self, category: &Category) -> Result<CategoryId, PocketError> {
        self.db
            .write(&[Table::Categories], |tx| insert_with(tx, category))
    }

    pub fn update(&self, category: &Category) -> Result<bool, PocketError> {
        self.db.write(&[Table::Categories], |tx| {
            let changed = tx.execute(
                "UPDATE categories SET name = ?1, type = ?2 WHERE id = ?3",
                params![category.name, category.category_type, category.id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, PocketError> {
        self.db.write(&[Table::Categories], |tx| {
            Ok(tx.execute("DELETE FROM categories WHERE id = ?1", params![id])? > 0)
        })
    }

    pub fn delete_all(&self) -> Result<usize, PocketError> {
        self.db
            .write(&[Table::Categories], |tx| Ok(tx.execute("DELETE FROM categories", [])?))
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, PocketError> {
        let conn = self.db.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, name, type FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )
            .optional()?)
    }

    /// All categories in insertion order
    pub fn get_all(&self) -> Result<Vec<Category>, PocketError> {
        select_all(&*self.db.conn()?)
    }

    /// Categories of one type in insertion order
    pub fn get_by_type(&self, category_type: TransactionType) -> Result<Vec<Category>, PocketError> {
        select_by_type(&*self.db.conn()?, category_type)
    }

    /// First category with this exact name, ignoring ASCII case
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, PocketError> {
        let conn = self.db.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, name, type FROM categories
                 WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1",
                params![name.trim()],
                row_to_category,
            )
            .optional()?)
    }

    pub fn count(&self) -> Result<usize, PocketError> {
        count_with(&*self.db.conn()?)
    }

    pub fn observe_all<F>(&self, callback: F) -> Result<Subscription, PocketError>
    where
        F: Fn(Vec<Category>) + Send + Sync + 'static,
    {
        self.db.observe(Table::Categories, select_all, callback)
    }

    pub fn observe_by_type<F>(
        &self,
        category_type: TransactionType,
        callback: F,
    ) -> Result<Subscription, PocketError>
    where
        F: Fn(Vec<Category>) + Send + Sync + 'static,
    {
        self.db.observe(
            Table::Categories,
            move |conn| select_by_type(conn, category_type),
            callback,
        )
    }
}

pub(crate) fn insert_with(conn: &Connection, category: &Category) -> Result<CategoryId, PocketError> {
    conn.execute(
        "INSERT INTO categories (name, type) VALUES (?1, ?2)",
        params![category.name, category.category_type],
    )?;
    Ok(CategoryId::new(conn.last_insert_rowid()))
}

pub(crate) fn count_with(conn: &Connection) -> Result<usize, PocketError> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    Ok(n as usize)
}

pub(crate) fn select_all(conn: &Connection) -> Result<Vec<Category>, PocketError> {
    let mut stmt = conn.prepare("SELECT id, name, type FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], row_to_category)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn select_by_type(
    conn: &Connection,
    category_type: TransactionType,
) -> Result<Vec<Category>, PocketError> {
    let mut stmt =
        conn.prepare("SELECT id, name, type FROM categories WHERE type = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![category_type], row_to_category)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        category_type: row.get(2)?,
    })
}
