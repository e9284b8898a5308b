//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Budget, Category, Currency, Transaction};

/// What happened to the audited record(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Bulk insert from an export file
    Import,
    /// Every table emptied
    Clear,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Import => "IMPORT",
            Operation::Clear => "CLEAR",
        };
        f.write_str(label)
    }
}

/// Kinds of audited records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Transaction,
    Category,
    Budget,
    Currency,
    /// The whole store, for import and clear
    Store,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityType::Transaction => "Transaction",
            EntityType::Category => "Category",
            EntityType::Budget => "Budget",
            EntityType::Currency => "Currency",
            EntityType::Store => "Store",
        };
        f.write_str(label)
    }
}

/// A record that can appear in the audit log
pub trait Audited: Serialize {
    const ENTITY_TYPE: EntityType;

    fn audit_id(&self) -> String;

    /// Short human label, e.g. a category name
    fn audit_name(&self) -> Option<String> {
        None
    }
}

impl Audited for Transaction {
    const ENTITY_TYPE: EntityType = EntityType::Transaction;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(format!(
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.transaction_type,
            self.amount
        ))
    }
}

impl Audited for Category {
    const ENTITY_TYPE: EntityType = EntityType::Category;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl Audited for Budget {
    const ENTITY_TYPE: EntityType = EntityType::Budget;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(format!("{} {:04}-{:02}", self.category_id, self.year, self.month))
    }
}

impl Audited for Currency {
    const ENTITY_TYPE: EntityType = EntityType::Currency;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> Option<String> {
        Some(self.code.clone())
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Record before an update or delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Record after a create or update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Changed fields, or a count summary for bulk operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn created<T: Audited>(record: &T) -> Self {
        Self {
            entity_name: record.audit_name(),
            after: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Create, T::ENTITY_TYPE, record.audit_id())
        }
    }

    /// Update entry; the diff summary is computed from the two snapshots
    pub fn updated<T: Audited>(before: &T, after: &T) -> Self {
        let before_json = serde_json::to_value(before).ok();
        let after_json = serde_json::to_value(after).ok();
        let diff_summary = match (&before_json, &after_json) {
            (Some(b), Some(a)) => super::diff::generate_diff(b, a),
            _ => None,
        };

        Self {
            entity_name: after.audit_name(),
            before: before_json,
            after: after_json,
            diff_summary,
            ..Self::new(Operation::Update, T::ENTITY_TYPE, after.audit_id())
        }
    }

    pub fn deleted<T: Audited>(record: &T) -> Self {
        Self {
            entity_name: record.audit_name(),
            before: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Delete, T::ENTITY_TYPE, record.audit_id())
        }
    }

    /// Store-wide entry (import, clear) carrying only a summary line
    pub fn bulk(operation: Operation, summary: impl Into<String>) -> Self {
        Self {
            diff_summary: Some(summary.into()),
            ..Self::new(operation, EntityType::Store, "*".to_string())
        }
    }

    /// Format the entry for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
