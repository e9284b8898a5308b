//! Core data models for Pocket
//!
//! This module contains the records the store persists (transactions,
//! categories, budgets, currencies) and the value types they are built from.

pub mod budget;
pub mod category;
pub mod currency;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::Budget;
pub use category::{Category, DefaultCategory};
pub use currency::Currency;
pub use ids::{BudgetId, CategoryId, CurrencyId, TransactionId};
pub use money::Money;
pub use period::MonthPeriod;
pub use transaction::{Transaction, TransactionType};
