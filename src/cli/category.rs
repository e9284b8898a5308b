//! Category CLI commands

use clap::{Subcommand, ValueEnum};

use crate::display::category::format_category_list;
use crate::error::PocketResult;
use crate::models::TransactionType;
use crate::services::CategoryService;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl From<CategoryKind> for TransactionType {
    fn from(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Income => TransactionType::Income,
            CategoryKind::Expense => TransactionType::Expense,
        }
    }
}

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories (seeds the defaults on first use)
    List {
        /// Only categories of this type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<CategoryKind>,
    },
    /// Add a category
    Add {
        name: String,
        /// Create an income category instead of an expense category
        #[arg(long)]
        income: bool,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PocketResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => service.categories_for_type(kind.into())?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }
        CategoryCommands::Add { name, income } => {
            let kind = if income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            };
            let category = service.create(&name, kind)?;
            println!(
                "Created {} category: {} ({})",
                category.category_type.to_string().to_lowercase(),
                category.name,
                category.id
            );
        }
    }

    Ok(())
}
