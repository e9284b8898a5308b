//! Budget progress display

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::format_bar;
use crate::reports::BudgetProgressReport;

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Budget")]
    limit: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

/// Budgets with a progress bar each, plus totals
pub fn format_budget_progress(report: &BudgetProgressReport, code: &str) -> String {
    let heading = match report.period {
        Some(period) => format!("Budgets: {}\n", period.long_name()),
        None => "Budgets\n".to_string(),
    };

    if report.rows.is_empty() {
        return format!("{}No budgets set.\n", heading);
    }

    let rows: Vec<ProgressRow> = report
        .rows
        .iter()
        .map(|row| ProgressRow {
            id: row.budget.id.get(),
            month: format!("{:04}-{:02}", row.budget.year, row.budget.month),
            category: row.category_name.clone(),
            spent: row.spent.format_with_code(code),
            limit: row.budget.amount.format_with_code(code),
            progress: format!(
                "{} {:>3}%{}",
                format_bar(row.percent, 20),
                row.percent,
                if row.is_exceeded() { " !" } else { "" }
            ),
        })
        .collect();

    let mut output = heading;
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output.push_str(&format!(
        "Total: {} of {} spent\n",
        report.total_spent().format_with_code(code),
        report.total_budgeted().format_with_code(code)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetId, CategoryId, Money, MonthPeriod};
    use crate::reports::BudgetProgress;

    #[test]
    fn test_progress_table() {
        let march = MonthPeriod::new(2025, 3).unwrap();
        let budget = Budget {
            id: BudgetId::new(1),
            ..Budget::new(CategoryId::new(2), Money::from_minor(10000), march)
        };
        let report = BudgetProgressReport {
            period: Some(march),
            rows: vec![BudgetProgress {
                budget,
                category_name: "Food".into(),
                spent: Money::from_minor(12000),
                percent: 100,
            }],
        };

        let output = format_budget_progress(&report, "LKR");
        assert!(output.starts_with("Budgets: March 2025"));
        assert!(output.contains("120.00 LKR"));
        assert!(output.contains("100% !"));
        assert!(output.contains("Total: 120.00 LKR of 100.00 LKR spent"));
    }

    #[test]
    fn test_no_budgets() {
        let report = BudgetProgressReport {
            period: None,
            rows: Vec::new(),
        };
        assert_eq!(format_budget_progress(&report, "LKR"), "Budgets\nNo budgets set.\n");
    }
}
