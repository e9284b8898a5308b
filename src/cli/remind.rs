//! Reminder CLI commands
//!
//! `remind run` is what a host scheduler (cron, systemd timer) invokes.

use chrono::Local;
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::error::PocketResult;
use crate::reminders::{
    default_schedules, describe_channel, run_job, BudgetThresholdJob, ConsoleSink,
    ExpenseLogReminderJob, ReminderJob,
};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobSelection {
    All,
    /// Budget threshold check
    Budget,
    /// "Log your expenses" reminder
    Daily,
}

/// Reminder subcommands
#[derive(Subcommand)]
pub enum RemindCommands {
    /// Run reminder jobs now and print their notifications
    Run {
        #[arg(short, long, value_enum, default_value = "all")]
        job: JobSelection,
    },
    /// Show when each job is next due
    Schedule,
}

/// Handle a reminder command
pub fn handle_remind_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RemindCommands,
) -> PocketResult<()> {
    match cmd {
        RemindCommands::Run { job } => {
            let threshold = BudgetThresholdJob::from_settings(&settings.reminders);
            let jobs: Vec<&dyn ReminderJob> = match job {
                JobSelection::All => vec![&threshold as &dyn ReminderJob, &ExpenseLogReminderJob],
                JobSelection::Budget => vec![&threshold],
                JobSelection::Daily => vec![&ExpenseLogReminderJob],
            };

            let today = Local::now().date_naive();
            let mut sink = ConsoleSink::new(std::io::stdout());
            for job in jobs {
                let report = run_job(job, storage, today, &mut sink)?;
                if report.emitted == 0 {
                    println!("{}: nothing to report", report.job);
                }
                if report.failed > 0 {
                    eprintln!("{}: {} notifications could not be delivered", report.job, report.failed);
                }
            }
        }
        RemindCommands::Schedule => {
            let now = Local::now().naive_local();
            println!("Channel: {}", describe_channel());
            for schedule in default_schedules(&settings.reminders)? {
                println!("{}", schedule.describe(now));
            }
        }
    }

    Ok(())
}
