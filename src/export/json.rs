//! JSON export and import
//!
//! The document has four top-level arrays (`transactions`, `budgets`,
//! `categories`, `currencies`) of camelCase records. Amounts are decimal
//! numbers and dates are epoch milliseconds.
//!
//! Import is lenient: a missing or malformed field takes a default value and
//! array elements that are not objects are skipped. Category and currency ids
//! are remapped so imported budgets and transactions point at the rows the
//! import created. Everything is inserted in one SQL transaction.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::audit::Operation;
use crate::config::paths::PocketPaths;
use crate::config::settings::ImportMode;
use crate::error::{PocketError, PocketResult};
use crate::models::transaction::{date_to_millis, millis_to_date};
use crate::models::{
    Budget, BudgetId, Category, CategoryId, Currency, CurrencyId, Money, Transaction,
    TransactionId, TransactionType,
};
use crate::storage::{self, budget, categories, currencies, transactions, Storage, Table};

/// One exported transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i64,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category_id: i64,
    pub date: i64,
    pub note: Option<String>,
    pub currency_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRecord {
    pub id: i64,
    pub code: String,
    pub is_default: bool,
}

impl From<&Transaction> for TransactionRecord {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.get(),
            amount: t.amount.to_decimal(),
            transaction_type: t.transaction_type.as_str().to_string(),
            category_id: t.category_id.get(),
            date: date_to_millis(&t.date),
            note: t.note.clone(),
            currency_id: t.currency_id.get(),
        }
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(b: &Budget) -> Self {
        Self {
            id: b.id.get(),
            category_id: b.category_id.get(),
            amount: b.amount.to_decimal(),
            month: b.month,
            year: b.year,
        }
    }
}

impl From<&Category> for CategoryRecord {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.get(),
            name: c.name.clone(),
            category_type: c.category_type.as_str().to_string(),
        }
    }
}

impl From<&Currency> for CurrencyRecord {
    fn from(c: &Currency) -> Self {
        Self {
            id: c.id.get(),
            code: c.code.clone(),
            is_default: c.is_default,
        }
    }
}

/// Full snapshot of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub transactions: Vec<TransactionRecord>,
    pub budgets: Vec<BudgetRecord>,
    pub categories: Vec<CategoryRecord>,
    pub currencies: Vec<CurrencyRecord>,
}

impl ExportDocument {
    /// Snapshot all four tables
    pub fn from_storage(storage: &Storage) -> PocketResult<Self> {
        Ok(Self {
            transactions: storage
                .transactions
                .get_all()?
                .iter()
                .map(TransactionRecord::from)
                .collect(),
            budgets: storage.budgets.get_all()?.iter().map(BudgetRecord::from).collect(),
            categories: storage
                .categories
                .get_all()?
                .iter()
                .map(CategoryRecord::from)
                .collect(),
            currencies: storage
                .currencies
                .get_all()?
                .iter()
                .map(CurrencyRecord::from)
                .collect(),
        })
    }

    pub fn record_count(&self) -> usize {
        self.transactions.len() + self.budgets.len() + self.categories.len() + self.currencies.len()
    }
}

/// Write the full export as pretty JSON to `writer`
pub fn export_json<W: Write>(storage: &Storage, writer: &mut W) -> PocketResult<ExportDocument> {
    let document = ExportDocument::from_storage(storage)?;
    serde_json::to_writer_pretty(&mut *writer, &document)
        .map_err(|e| PocketError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| PocketError::Export(e.to_string()))?;
    Ok(document)
}

/// Write the export atomically to `finance_backup.json` in the data directory
pub fn export_to_file(storage: &Storage, paths: &PocketPaths) -> PocketResult<PathBuf> {
    let path = paths.backup_file();
    let document = ExportDocument::from_storage(storage)?;
    storage::write_json_atomic(&path, &document)
        .map_err(|e| PocketError::Export(e.to_string()))?;

    tracing::info!(path = %path.display(), records = document.record_count(), "exported data");
    Ok(path)
}

/// What an import did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: usize,
    pub budgets: usize,
    pub categories: usize,
    pub currencies: usize,
    /// Imported categories matched to an existing row by name and type
    pub reused_categories: usize,
    /// Imported currencies matched to an existing row by code
    pub reused_currencies: usize,
    /// Array elements that were not JSON objects
    pub skipped: usize,
    /// Rows deleted first in replace mode
    pub cleared: usize,
}

impl ImportSummary {
    pub fn inserted(&self) -> usize {
        self.transactions + self.budgets + self.categories + self.currencies
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} transactions, {} budgets, {} categories, {} currencies",
            self.transactions, self.budgets, self.categories, self.currencies
        )?;
        if self.skipped > 0 {
            write!(f, " ({} malformed entries skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Import a JSON document into `storage`
///
/// In [`ImportMode::Merge`] existing rows stay; categories and currencies
/// that already exist are reused instead of duplicated. In
/// [`ImportMode::Replace`] every table is cleared first, inside the same
/// transaction.
pub fn import_json(storage: &Storage, json: &str, mode: ImportMode) -> PocketResult<ImportSummary> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| PocketError::Import(format!("Invalid JSON: {}", e)))?;
    let root = root
        .as_object()
        .ok_or_else(|| PocketError::Import("Expected a JSON object at the top level".into()))?;

    let summary = storage
        .database()
        .write(Table::all(), |tx| import_document(tx, root, mode))?;

    tracing::info!(?mode, inserted = summary.inserted(), skipped = summary.skipped, "imported data");
    if summary.skipped > 0 {
        tracing::warn!(skipped = summary.skipped, "import skipped non-object entries");
    }
    storage.log_bulk(Operation::Import, summary.to_string())?;

    Ok(summary)
}

/// Import from a file (defaults to `finance_backup.json`)
pub fn import_from_file(
    storage: &Storage,
    path: &Path,
    mode: ImportMode,
) -> PocketResult<ImportSummary> {
    let json = storage::file_io::read_to_string_required(path)
        .map_err(|e| PocketError::Import(e.to_string()))?;
    import_json(storage, &json, mode)
}

fn import_document(
    conn: &Connection,
    root: &Map<String, Value>,
    mode: ImportMode,
) -> PocketResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    if mode == ImportMode::Replace {
        summary.cleared = storage::clear_tables(conn)?;
    }

    let category_ids = import_categories(conn, elements(root, "categories", &mut summary), &mut summary)?;
    let currency_ids = import_currencies(conn, elements(root, "currencies", &mut summary), &mut summary)?;

    for obj in elements(root, "budgets", &mut summary) {
        let budget = Budget {
            id: BudgetId::default(),
            category_id: remap(&category_ids, int_field(obj, "categoryId")),
            amount: Money::from_decimal(float_field(obj, "amount")),
            month: int_field(obj, "month").clamp(0, u32::MAX as i64) as u32,
            year: int_field(obj, "year").clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        };
        budget::insert_with(conn, &budget)?;
        summary.budgets += 1;
    }

    for obj in elements(root, "transactions", &mut summary) {
        let txn = Transaction {
            id: TransactionId::default(),
            amount: Money::from_decimal(float_field(obj, "amount")),
            transaction_type: type_field(obj, "type"),
            category_id: remap(&category_ids, int_field(obj, "categoryId")),
            date: date_field(obj, "date"),
            note: obj
                .get("note")
                .and_then(Value::as_str)
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string),
            currency_id: remap(&currency_ids, int_field(obj, "currencyId")),
        };
        transactions::insert_with(conn, &txn)?;
        summary.transactions += 1;
    }

    Ok(summary)
}

fn import_categories<'a>(
    conn: &Connection,
    records: Vec<&'a Map<String, Value>>,
    summary: &mut ImportSummary,
) -> PocketResult<HashMap<i64, CategoryId>> {
    let existing = categories::select_all(conn)?;
    let mut ids = HashMap::new();

    for obj in records {
        let category = Category::new(str_field(obj, "name"), type_field(obj, "type"));

        let id = match existing
            .iter()
            .find(|c| c.name == category.name && c.category_type == category.category_type)
        {
            Some(found) => {
                summary.reused_categories += 1;
                found.id
            }
            None => {
                summary.categories += 1;
                categories::insert_with(conn, &category)?
            }
        };
        ids.insert(int_field(obj, "id"), id);
    }

    Ok(ids)
}

fn import_currencies<'a>(
    conn: &Connection,
    records: Vec<&'a Map<String, Value>>,
    summary: &mut ImportSummary,
) -> PocketResult<HashMap<i64, CurrencyId>> {
    let existing = currencies::select_all(conn)?;
    let mut has_default = existing.iter().any(|c| c.is_default);
    let mut ids = HashMap::new();

    for obj in records {
        let mut currency = Currency::new(str_field(obj, "code"), bool_field(obj, "isDefault"));

        let id = match existing.iter().find(|c| c.code == currency.code) {
            Some(found) => {
                summary.reused_currencies += 1;
                found.id
            }
            None => {
                // Only one default may survive the import
                currency.is_default = currency.is_default && !has_default;
                has_default |= currency.is_default;
                summary.currencies += 1;
                currencies::insert_with(conn, &currency)?
            }
        };
        ids.insert(int_field(obj, "id"), id);
    }

    Ok(ids)
}

/// Object elements of a top-level array; anything else is counted as skipped
fn elements<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    summary: &mut ImportSummary,
) -> Vec<&'a Map<String, Value>> {
    let Some(items) = root.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object();
            if obj.is_none() {
                summary.skipped += 1;
            }
            obj
        })
        .collect()
}

/// Imported ids that match an imported row are rewritten; others are kept
fn remap<T: From<i64> + Copy>(ids: &HashMap<i64, T>, raw: i64) -> T {
    ids.get(&raw).copied().unwrap_or_else(|| T::from(raw))
}

fn float_field(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Integers may arrive as floats (e.g. `3.0`); those are truncated
fn int_field(obj: &Map<String, Value>, key: &str) -> i64 {
    match obj.get(key) {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        None => 0,
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn type_field(obj: &Map<String, Value>, key: &str) -> TransactionType {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(TransactionType::Expense)
}

fn date_field(obj: &Map<String, Value>, key: &str) -> NaiveDateTime {
    obj.get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .and_then(millis_to_date)
        .unwrap_or_else(|| Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::MonthPeriod;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    fn create_test_storage() -> Storage {
        let storage = Storage::in_memory().unwrap();
        storage.bootstrap(&Settings::default()).unwrap();
        storage
    }

    fn populate(storage: &Storage) {
        let food = storage.categories.get_by_name("Food").unwrap().unwrap();
        let salary = storage.categories.get_by_name("Salary").unwrap().unwrap();
        let lkr = storage.currencies.get_default().unwrap().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(19, 45, 0)
            .unwrap();

        storage
            .transactions
            .insert(
                &Transaction::new(
                    Money::from_minor(1250),
                    TransactionType::Expense,
                    food.id,
                    date,
                    lkr.id,
                )
                .with_note("lunch"),
            )
            .unwrap();
        storage
            .transactions
            .insert(&Transaction::new(
                Money::from_minor(500000),
                TransactionType::Income,
                salary.id,
                date,
                lkr.id,
            ))
            .unwrap();
        storage
            .budgets
            .insert(&Budget::new(
                food.id,
                Money::from_minor(10000),
                MonthPeriod::new(2025, 3).unwrap(),
            ))
            .unwrap();
    }

    /// Records with ids replaced by the names/codes they point at
    fn logical(storage: &Storage) -> (Vec<String>, Vec<String>, Vec<String>, Vec<String>) {
        let cats = storage.categories.get_all().unwrap();
        let curs = storage.currencies.get_all().unwrap();
        let cat_name = |id: CategoryId| cats.iter().find(|c| c.id == id).unwrap().name.clone();
        let cur_code = |id: CurrencyId| curs.iter().find(|c| c.id == id).unwrap().code.clone();

        let mut txns: Vec<String> = storage
            .transactions
            .get_all()
            .unwrap()
            .iter()
            .map(|t| {
                format!(
                    "{} {} {} {} {:?} {}",
                    t.amount,
                    t.transaction_type,
                    cat_name(t.category_id),
                    t.date,
                    t.note,
                    cur_code(t.currency_id)
                )
            })
            .collect();
        let mut budgets: Vec<String> = storage
            .budgets
            .get_all()
            .unwrap()
            .iter()
            .map(|b| format!("{} {} {}-{}", cat_name(b.category_id), b.amount, b.year, b.month))
            .collect();
        let mut categories: Vec<String> = cats
            .iter()
            .map(|c| format!("{} {}", c.name, c.category_type))
            .collect();
        let mut currencies: Vec<String> = curs
            .iter()
            .map(|c| format!("{} {}", c.code, c.is_default))
            .collect();

        txns.sort();
        budgets.sort();
        categories.sort();
        currencies.sort();
        (txns, budgets, categories, currencies)
    }

    #[test]
    fn test_export_shape() {
        let storage = create_test_storage();
        populate(&storage);

        let mut out = Vec::new();
        export_json(&storage, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();

        let txn = &value["transactions"][0];
        assert!(txn.get("categoryId").is_some());
        assert!(txn.get("currencyId").is_some());
        assert!(txn["date"].is_i64());
        assert_eq!(value["categories"].as_array().unwrap().len(), 5);
        assert_eq!(value["currencies"][0]["isDefault"], Value::Bool(true));
        assert_eq!(value["budgets"][0]["amount"].as_f64(), Some(100.0));
    }

    #[test]
    fn test_export_then_import_into_empty_store() {
        let source = create_test_storage();
        populate(&source);
        let mut out = Vec::new();
        export_json(&source, &mut out).unwrap();

        let target = Storage::in_memory().unwrap();
        // Shift ids so remapping is actually exercised
        target
            .categories
            .insert(&Category::new("Placeholder", TransactionType::Income))
            .unwrap();
        target.categories.delete_all().unwrap();

        let summary =
            import_json(&target, std::str::from_utf8(&out).unwrap(), ImportMode::Merge).unwrap();

        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.budgets, 1);
        assert_eq!(summary.categories, 5);
        assert_eq!(summary.currencies, 1);
        assert_eq!(logical(&target), logical(&source));
    }

    #[test]
    fn test_import_defaults_malformed_fields() {
        let storage = Storage::in_memory().unwrap();
        let json = r#"{
            "transactions": [
                {"amount": "oops", "type": "SIDEWAYS", "date": "yesterday"},
                42,
                "not an object"
            ],
            "categories": [{"id": 3.0, "name": 7}],
            "currencies": [{"code": "usd"}]
        }"#;

        let summary = import_json(&storage, json, ImportMode::Merge).unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.transactions, 1);

        let txn = &storage.transactions.get_all().unwrap()[0];
        assert!(txn.amount.is_zero());
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(txn.category_id.get(), 0);
        assert_eq!(txn.note, None);

        let category = &storage.categories.get_all().unwrap()[0];
        assert_eq!(category.name, "");
        assert_eq!(category.category_type, TransactionType::Expense);

        let currency = &storage.currencies.get_all().unwrap()[0];
        assert_eq!(currency.code, "USD");
        assert!(!currency.is_default);
    }

    #[test]
    fn test_dates_are_true_epoch_millis() {
        let storage = create_test_storage();
        let json = r#"{"transactions": [{"amount": 5.0, "date": 1700000000000}]}"#;
        import_json(&storage, json, ImportMode::Merge).unwrap();

        let expected = Local.timestamp_millis_opt(1_700_000_000_000).unwrap().naive_local();
        let txn = &storage.transactions.get_all().unwrap()[0];
        assert_eq!(txn.date, expected);

        let document = ExportDocument::from_storage(&storage).unwrap();
        assert_eq!(document.transactions[0].date, 1_700_000_000_000);
    }

    #[test]
    fn test_merge_reuses_existing_rows() {
        let storage = create_test_storage();
        let json = r#"{
            "categories": [{"id": 10, "name": "Food", "type": "EXPENSE"}],
            "currencies": [{"id": 20, "code": "LKR", "isDefault": true},
                           {"id": 21, "code": "USD", "isDefault": true}],
            "budgets": [{"categoryId": 10, "amount": 50.0, "month": 4, "year": 2025}]
        }"#;

        let summary = import_json(&storage, json, ImportMode::Merge).unwrap();
        assert_eq!(summary.reused_categories, 1);
        assert_eq!(summary.reused_currencies, 1);
        assert_eq!(summary.currencies, 1);
        assert_eq!(storage.categories.count().unwrap(), 5);

        let food = storage.categories.get_by_name("Food").unwrap().unwrap();
        assert_eq!(storage.budgets.get_all().unwrap()[0].category_id, food.id);

        let defaults: Vec<Currency> = storage
            .currencies
            .get_all()
            .unwrap()
            .into_iter()
            .filter(|c| c.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].code, "LKR");
    }

    #[test]
    fn test_replace_mode_clears_first() {
        let storage = create_test_storage();
        populate(&storage);
        let json = r#"{"categories": [{"id": 1, "name": "Rent", "type": "EXPENSE"}]}"#;

        let summary = import_json(&storage, json, ImportMode::Replace).unwrap();
        assert_eq!(summary.cleared, 9);
        assert!(storage.transactions.get_all().unwrap().is_empty());
        assert!(storage.currencies.get_all().unwrap().is_empty());
        assert_eq!(storage.categories.get_all().unwrap()[0].name, "Rent");
    }

    #[test]
    fn test_invalid_document_changes_nothing() {
        let storage = create_test_storage();
        assert!(matches!(
            import_json(&storage, "[1, 2]", ImportMode::Replace),
            Err(PocketError::Import(_))
        ));
        assert!(matches!(
            import_json(&storage, "{not json", ImportMode::Merge),
            Err(PocketError::Import(_))
        ));
        assert_eq!(storage.categories.count().unwrap(), 5);
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, &Settings::default()).unwrap();
        storage.bootstrap(&Settings::default()).unwrap();
        populate(&storage);

        let path = export_to_file(&storage, &paths).unwrap();
        assert_eq!(path, paths.backup_file());

        let summary = import_from_file(&storage, &path, ImportMode::Replace).unwrap();
        assert_eq!(summary.transactions, 2);
        assert_eq!(storage.categories.count().unwrap(), 5);

        let missing = import_from_file(&storage, &temp_dir.path().join("nope.json"), ImportMode::Merge);
        assert!(matches!(missing, Err(PocketError::Import(_))));
    }
}
