//! Display formatting for terminal output
//!
//! Every formatter returns a `String`; printing is left to the CLI handlers.

pub mod budget;
pub mod category;
pub mod dashboard;
pub mod report;
pub mod transaction;

pub use budget::format_budget_progress;
pub use category::{format_category_list, format_currency_list};
pub use dashboard::{format_dashboard, format_year_summary};
pub use transaction::{format_transaction_details, format_transaction_list};
