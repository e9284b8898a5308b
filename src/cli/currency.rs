//! Currency CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::format_currency_list;
use crate::error::PocketResult;
use crate::services::CurrencyService;
use crate::storage::Storage;

/// Currency subcommands
#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// List stored currencies (default marked with *)
    List,
    /// Make a supported currency the default
    Set {
        /// Currency code, e.g. USD
        code: String,
    },
}

/// Handle a currency command
pub fn handle_currency_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CurrencyCommands,
) -> PocketResult<()> {
    let service = CurrencyService::new(storage);

    match cmd {
        CurrencyCommands::List => {
            print!("{}", format_currency_list(&service.list()?));
            println!("Supported: {}", settings.supported_currencies.join(", "));
        }
        CurrencyCommands::Set { code } => {
            let currency = service.set_default(&code, settings)?;
            println!("Default currency: {}", currency.code);
        }
    }

    Ok(())
}
