//! Category model
//!
//! Every transaction and budget points at a category. A category is either an
//! income or an expense category.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionType;

/// A spending or income category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Row id; zero until the store assigns one
    pub id: CategoryId,

    /// Display name (unique by convention only)
    pub name: String,

    pub category_type: TransactionType,
}

impl Category {
    /// Create a new, not yet stored category
    pub fn new(name: impl Into<String>, category_type: TransactionType) -> Self {
        Self {
            id: CategoryId::default(),
            name: name.into(),
            category_type,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Label shown for a category id with no matching row
pub fn fallback_name(id: CategoryId) -> String {
    format!("Category {}", id.get())
}

/// Categories seeded into an empty store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Salary,
    Food,
    Transport,
    Bills,
    Entertainment,
}

impl DefaultCategory {
    /// All defaults in seeding order
    pub fn all() -> &'static [Self] {
        &[
            Self::Salary,
            Self::Food,
            Self::Transport,
            Self::Bills,
            Self::Entertainment,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Entertainment => "Entertainment",
        }
    }

    pub fn category_type(&self) -> TransactionType {
        match self {
            Self::Salary => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }

    pub fn to_category(&self) -> Category {
        Category::new(self.name(), self.category_type())
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", TransactionType::Expense);
        assert_eq!(category.name, "Groceries");
        assert!(!category.id.is_assigned());
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("  ", TransactionType::Expense);
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_defaults() {
        let defaults = DefaultCategory::all();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0].name(), "Salary");
        assert_eq!(defaults[0].category_type(), TransactionType::Income);

        let expense_names: Vec<_> = defaults
            .iter()
            .filter(|d| d.category_type() == TransactionType::Expense)
            .map(|d| d.name())
            .collect();
        assert_eq!(expense_names, ["Food", "Transport", "Bills", "Entertainment"]);
    }
}
