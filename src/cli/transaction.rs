//! Transaction CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_period};
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::config::Settings;
use crate::error::{PocketError, PocketResult};
use crate::models::{TransactionId, TransactionType};
use crate::services::{
    CategoryService, CreateTransactionInput, CurrencyService, TransactionFilter,
    TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// Record as income (the category must be an income category)
        #[arg(long)]
        income: bool,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Date (YYYY-MM-DD or "YYYY-MM-DD HH:MM"), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
        /// Currency code, defaults to the default currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        /// New category; an income category turns it into income
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// New note; an empty string removes it
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

fn parse_id(id: &str) -> PocketResult<TransactionId> {
    id.parse()
        .map_err(|_| PocketError::Validation(format!("Invalid transaction ID: '{}'", id)))
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> PocketResult<()> {
    let date_format = settings.date_format();
    let service = TransactionService::new(storage);
    let category_service = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            income,
            category,
            date,
            note,
            currency,
        } => {
            let category = category_service.find(&category)?;
            let currency_id = match currency {
                Some(code) => Some(CurrencyService::new(storage).find_by_code(&code)?.id),
                None => None,
            };

            let txn = service.create(CreateTransactionInput {
                amount: parse_amount(&amount)?,
                transaction_type: income.then_some(TransactionType::Income),
                category_id: category.id,
                date: parse_date(date.as_deref())?,
                note,
                currency_id,
            })?;

            println!("Created transaction:");
            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    &[category],
                    &storage.currencies.get_all()?,
                    date_format,
                )
            );
        }

        TransactionCommands::List {
            month,
            category,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if month.is_some() {
                filter = filter.period(parse_period(month.as_deref())?);
            }
            if let Some(name) = &category {
                filter = filter.category(category_service.find(name)?.id);
            }

            let transactions = service.list(filter)?;
            print!(
                "{}",
                format_transaction_list(
                    &transactions,
                    &storage.categories.get_all()?,
                    &storage.currencies.get_all()?,
                    date_format,
                )
            );
            println!("Showing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(parse_id(&id)?)?;
            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    &storage.categories.get_all()?,
                    &storage.currencies.get_all()?,
                    date_format,
                )
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            date,
            note,
        } => {
            let input = UpdateTransactionInput {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category_id: match category {
                    Some(name) => Some(category_service.find(&name)?.id),
                    None => None,
                },
                date: match date {
                    Some(d) => Some(parse_date(Some(&d))?),
                    None => None,
                },
                note: note.map(Some),
                currency_id: None,
            };

            let updated = service.update(parse_id(&id)?, input)?;
            println!("Updated transaction: {}", updated.id);
            print!(
                "{}",
                format_transaction_details(
                    &updated,
                    &storage.categories.get_all()?,
                    &storage.currencies.get_all()?,
                    date_format,
                )
            );
        }

        TransactionCommands::Delete { id } => {
            let deleted = service.delete(parse_id(&id)?)?;
            println!(
                "Deleted transaction: {} ({} {})",
                deleted.id,
                deleted.date.format(date_format),
                deleted.amount
            );
        }
    }

    Ok(())
}
