//! Data export and import for Pocket
//!
//! A single JSON document holds every transaction, budget, category and
//! currency. The same document is read back by the import.

pub mod json;

pub use json::{
    export_json, export_to_file, import_from_file, import_json, BudgetRecord, CategoryRecord,
    CurrencyRecord, ExportDocument, ImportSummary, TransactionRecord,
};
