//! Transaction display formatting
//!
//! Lists resolve category names and currency codes for each row; ids that no
//! longer resolve show as "Unknown". Dates use the caller's strftime format
//! followed by the time of day.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Category, Currency, Transaction};

const UNKNOWN: &str = "Unknown";

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

fn category_name(categories: &[Category], txn: &Transaction) -> String {
    categories
        .iter()
        .find(|c| c.id == txn.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn currency_code(currencies: &[Currency], txn: &Transaction) -> String {
    currencies
        .iter()
        .find(|c| c.id == txn.currency_id)
        .map(|c| c.code.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn format_timestamp(txn: &Transaction, date_format: &str) -> String {
    format!("{} {}", txn.date.format(date_format), txn.date.format("%H:%M"))
}

/// Format transactions as a table, newest first as given
pub fn format_transaction_list(
    transactions: &[Transaction],
    categories: &[Category],
    currencies: &[Currency],
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: txn.id.get(),
            date: format_timestamp(txn, date_format),
            kind: if txn.is_income() { "Income" } else { "Expense" },
            category: category_name(categories, txn),
            amount: txn.amount.format_with_code(&currency_code(currencies, txn)),
            note: super::report::truncate(txn.note.as_deref().unwrap_or(""), 30),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    categories: &[Category],
    currencies: &[Currency],
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", format_timestamp(txn, date_format)));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_code(&currency_code(currencies, txn))
    ));
    output.push_str(&format!("Category:    {}\n", category_name(categories, txn)));

    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output
}
