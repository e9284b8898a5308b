//! Service layer for Pocket
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, defaults and audit logging.

pub mod budget;
pub mod category;
pub mod currency;
pub mod transaction;

pub use budget::BudgetService;
pub use category::CategoryService;
pub use currency::CurrencyService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
