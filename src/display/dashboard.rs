//! Dashboard display

use super::report::{double_separator, format_chart, separator};
use crate::reports::{Dashboard, DashboardSummary, YearSummary};

const WIDTH: usize = 60;

fn summary_lines(summary: &DashboardSummary, code: &str) -> String {
    format!(
        "Income:   {:>16}\nExpense:  {:>16}\nBalance:  {:>16}\n",
        summary.income.format_with_code(code),
        summary.expense.format_with_code(code),
        summary.balance.format_with_code(code)
    )
}

/// Month summary followed by the expense and income breakdowns
pub fn format_dashboard(dashboard: &Dashboard, code: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Dashboard: {}\n", dashboard.summary.period.long_name()));
    output.push_str(&double_separator(WIDTH));
    output.push('\n');
    output.push_str(&summary_lines(&dashboard.summary, code));

    output.push_str(&format!("\nExpenses by category\n{}\n", separator(WIDTH)));
    output.push_str(&format_chart(&dashboard.expense_by_category, code));

    output.push_str(&format!("\nIncome by category\n{}\n", separator(WIDTH)));
    output.push_str(&format_chart(&dashboard.income_by_category, code));

    output
}

/// One line per month plus the year totals
pub fn format_year_summary(year: &YearSummary, code: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Year {}\n", year.year));
    output.push_str(&double_separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<10} {:>15} {:>15} {:>15}\n",
        "Month", "Income", "Expense", "Balance"
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    for month in &year.months {
        output.push_str(&format!(
            "{:<10} {:>15} {:>15} {:>15}\n",
            month.period.month_name(),
            month.income.to_string(),
            month.expense.to_string(),
            month.balance.to_string()
        ));
    }

    output.push_str(&separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<10} {:>15} {:>15} {:>15}\n",
        format!("Total {}", code),
        year.income.to_string(),
        year.expense.to_string(),
        year.balance.to_string()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MonthPeriod};
    use crate::reports::ChartEntry;

    #[test]
    fn test_format_dashboard() {
        let period = MonthPeriod::new(2025, 3).unwrap();
        let dashboard = Dashboard {
            summary: DashboardSummary {
                period,
                income: Money::from_minor(500000),
                expense: Money::from_minor(23000),
                balance: Money::from_minor(477000),
            },
            expense_by_category: vec![ChartEntry::new("Food", Money::from_minor(23000))],
            income_by_category: Vec::new(),
        };

        let output = format_dashboard(&dashboard, "LKR");
        assert!(output.starts_with("Dashboard: March 2025"));
        assert!(output.contains("4770.00 LKR"));
        assert!(output.contains("Food"));
        assert!(output.contains("(nothing recorded)"));
    }

    #[test]
    fn test_format_year_summary() {
        let year = YearSummary::compute(&[], 2025);
        let output = format_year_summary(&year, "USD");
        assert!(output.contains("January"));
        assert!(output.contains("December"));
        assert!(output.contains("Total USD"));
    }
}
