//! Dashboard CLI command

use clap::Args;

use super::{default_code, parse_period};
use crate::display::dashboard::{format_dashboard, format_year_summary};
use crate::error::PocketResult;
use crate::reports::{Dashboard, YearSummary};
use crate::storage::Storage;

#[derive(Args)]
pub struct DashboardArgs {
    /// Month to summarize (YYYY-MM), defaults to the current month
    #[arg(short, long, conflicts_with = "year")]
    pub month: Option<String>,
    /// Show a whole year month by month instead
    #[arg(short, long)]
    pub year: Option<i32>,
}

/// Handle the dashboard command
pub fn handle_dashboard_command(storage: &Storage, args: DashboardArgs) -> PocketResult<()> {
    let code = default_code(storage)?;

    match args.year {
        Some(year) => {
            let summary = YearSummary::compute(&storage.transactions.get_all()?, year);
            print!("{}", format_year_summary(&summary, &code));
        }
        None => {
            let period = parse_period(args.month.as_deref())?;
            let dashboard = Dashboard::generate(storage, period)?;
            print!("{}", format_dashboard(&dashboard, &code));
        }
    }

    Ok(())
}
