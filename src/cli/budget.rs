//! Budget CLI commands

use clap::Subcommand;

use super::{default_code, parse_amount, parse_period};
use crate::display::budget::format_budget_progress;
use crate::error::{PocketError, PocketResult};
use crate::models::BudgetId;
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a monthly budget for an expense category
    Set {
        /// Category name or ID
        category: String,
        /// Limit (e.g., "250.00")
        amount: String,
        /// Budget month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<String>,
    },
    /// List budgets with their progress
    List {
        /// Only this month (YYYY-MM); all budgets when omitted
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Change a budget's limit
    Edit {
        /// Budget ID
        id: String,
        amount: String,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

fn parse_id(id: &str) -> PocketResult<BudgetId> {
    id.parse()
        .map_err(|_| PocketError::Validation(format!("Invalid budget ID: '{}'", id)))
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> PocketResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            period,
        } => {
            let category = CategoryService::new(storage).find(&category)?;
            let period = parse_period(period.as_deref())?;
            let budget = service.create(category.id, parse_amount(&amount)?, period)?;

            println!(
                "Budget set: {} {} for {} ({})",
                category.name,
                budget.amount.format_with_code(&default_code(storage)?),
                period.long_name(),
                budget.id
            );
        }
        BudgetCommands::List { period } => {
            let period = match period {
                Some(p) => Some(parse_period(Some(&p))?),
                None => None,
            };
            let report = service.progress(period)?;
            print!("{}", format_budget_progress(&report, &default_code(storage)?));
        }
        BudgetCommands::Edit { id, amount } => {
            let budget = service.update_amount(parse_id(&id)?, parse_amount(&amount)?)?;
            println!("Updated budget {}: {}", budget.id, budget.amount);
        }
        BudgetCommands::Delete { id } => {
            let budget = service.delete(parse_id(&id)?)?;
            println!("Deleted budget: {}", budget.id);
        }
    }

    Ok(())
}
