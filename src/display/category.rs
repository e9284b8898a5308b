//! Category and currency display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Category, Currency};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.get(),
            name: c.name.clone(),
            kind: c.category_type.to_string(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Stored currencies, default marked with `*`
pub fn format_currency_list(currencies: &[Currency]) -> String {
    if currencies.is_empty() {
        return "No currencies stored.\n".to_string();
    }

    let mut output = String::new();
    for currency in currencies {
        let marker = if currency.is_default { "*" } else { " " };
        output.push_str(&format!("{} {}\n", marker, currency.code));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    #[test]
    fn test_category_table() {
        let output = format_category_list(&[Category::new("Food", TransactionType::Expense)]);
        assert!(output.contains("Food"));
        assert!(output.contains("Expense"));
    }

    #[test]
    fn test_currency_list_marks_default() {
        let output = format_currency_list(&[Currency::new("LKR", true), Currency::new("USD", false)]);
        assert_eq!(output, "* LKR\n  USD\n");
    }
}
