//! Reports for Pocket
//!
//! Pure aggregations over storage snapshots: the monthly dashboard with its
//! chart data, and budget progress.

pub mod budget_progress;
pub mod dashboard;

pub use budget_progress::{budget_progress, progress_percent, BudgetProgress, BudgetProgressReport};
pub use dashboard::{
    category_breakdown, monthly_series, ChartEntry, Dashboard, DashboardSummary, YearSummary,
};
