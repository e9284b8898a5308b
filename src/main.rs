use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pocket::cli::{
    handle_budget_command, handle_category_command, handle_clear, handle_currency_command,
    handle_dashboard_command, handle_export, handle_import, handle_remind_command,
    handle_transaction_command, BudgetCommands, CategoryCommands, CurrencyCommands,
    DashboardArgs, RemindCommands, TransactionCommands,
};
use pocket::config::{PocketPaths, Settings};
use pocket::storage::Storage;

/// Environment variable holding the log filter, e.g. `POCKET_LOG=debug`
const LOG_ENV: &str = "POCKET_LOG";

#[derive(Parser)]
#[command(
    name = "pocket",
    version,
    about = "Local-first personal finance tracker",
    long_about = "Pocket records income and expenses by category, tracks monthly \
                  budgets per expense category and reminds you when a budget is \
                  close to its limit. Everything lives in one SQLite file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Currency commands
    #[command(subcommand)]
    Currency(CurrencyCommands),

    /// Monthly summary and category breakdown
    Dashboard(DashboardArgs),

    /// Export all data as JSON
    Export {
        /// Print to stdout instead of writing finance_backup.json
        #[arg(long)]
        stdout: bool,
    },

    /// Import a JSON export
    Import {
        /// File to read, defaults to finance_backup.json in the data directory
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Clear all data before importing
        #[arg(long)]
        replace: bool,
    },

    /// Delete all data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Reminder jobs
    #[command(subcommand)]
    Remind(RemindCommands),

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PocketPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(&paths, &settings)?;
    storage.bootstrap(&settings)?;

    match cli.command {
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Currency(cmd)) => handle_currency_command(&storage, &settings, cmd)?,
        Some(Commands::Dashboard(args)) => handle_dashboard_command(&storage, args)?,
        Some(Commands::Export { stdout }) => handle_export(&storage, &paths, stdout)?,
        Some(Commands::Import { file, replace }) => {
            handle_import(&storage, &paths, &settings, file, replace)?
        }
        Some(Commands::Clear { yes }) => handle_clear(&storage, yes)?,
        Some(Commands::Remind(cmd)) => handle_remind_command(&storage, &settings, cmd)?,
        Some(Commands::Config) => {
            println!("Pocket Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Database:       {}", paths.database_file().display());
            println!("Export file:    {}", paths.backup_file().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Default currency:     {}", settings.default_currency_code);
            println!("  Supported currencies: {}", settings.supported_currencies.join(", "));
            println!(
                "  Approaching at:       {}%",
                settings.reminders.approaching_threshold_percent
            );
            println!("  Spend scope:          {:?}", settings.reminders.spend_scope);
            println!("  Date format:          {}", settings.date_format());
            println!("  Import mode:          {:?}", settings.import_mode);
            println!("  Audit log enabled:    {}", settings.audit_enabled);
            println!("  Notifications:        {}", pocket::reminders::describe_channel());
        }
        None => {
            println!("Pocket - local-first personal finance tracker");
            println!();
            println!("Run 'pocket --help' for usage information.");
            println!("Run 'pocket dashboard' for this month's summary.");
        }
    }

    Ok(())
}
