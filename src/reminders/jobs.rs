//! Reminder jobs
//!
//! A job reads the store and decides which notifications to emit. Running it
//! hands each notification to a sink; nothing else is written.

use chrono::NaiveDate;

use super::notification::Notification;
use super::sink::NotificationSink;
use crate::config::settings::{ReminderSettings, SpendScope};
use crate::error::PocketResult;
use crate::models::category::fallback_name;
use crate::models::{Budget, CategoryId, Money, MonthPeriod};
use crate::reports::budget_progress::spent_in_budget_period;
use crate::storage::Storage;

/// A periodic check that may emit notifications
pub trait ReminderJob {
    /// Unique schedule name
    fn name(&self) -> &'static str;

    /// Notifications to emit for a run on `today`
    fn notifications(&self, storage: &Storage, today: NaiveDate) -> PocketResult<Vec<Notification>>;
}

/// Compares each current budget with what its category has spent
#[derive(Debug, Clone, Copy)]
pub struct BudgetThresholdJob {
    pub approaching_percent: u8,
    pub scope: SpendScope,
}

impl Default for BudgetThresholdJob {
    fn default() -> Self {
        Self::from_settings(&ReminderSettings::default())
    }
}

impl BudgetThresholdJob {
    pub fn from_settings(settings: &ReminderSettings) -> Self {
        Self {
            approaching_percent: settings.approaching_threshold_percent,
            scope: settings.spend_scope,
        }
    }

    fn spent(&self, storage: &Storage, budget: &Budget) -> PocketResult<Money> {
        match self.scope {
            SpendScope::AllTime => storage
                .transactions
                .expense_total_for_category(budget.category_id),
            SpendScope::BudgetPeriod => {
                let Some(period) = budget.period() else {
                    return Ok(Money::zero());
                };
                let transactions = storage.transactions.get_in_period(period)?;
                Ok(spent_in_budget_period(budget, &transactions))
            }
        }
    }
}

impl ReminderJob for BudgetThresholdJob {
    fn name(&self) -> &'static str {
        super::schedule::BUDGET_REMINDER_JOB
    }

    fn notifications(&self, storage: &Storage, today: NaiveDate) -> PocketResult<Vec<Notification>> {
        let period = MonthPeriod::from_date(today);
        let budgets = storage.budgets.get_for_period(period)?;
        let categories = storage.categories.get_all()?;

        let mut out = Vec::new();
        for budget in &budgets {
            // One unreadable budget must not cancel the others
            let spent = match self.spent(storage, budget) {
                Ok(spent) => spent,
                Err(e) => {
                    tracing::warn!(budget = %budget.id, error = %e, "skipping budget in threshold check");
                    continue;
                }
            };

            let name = categories
                .iter()
                .find(|c| c.id == budget.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| fallback_name(budget.category_id));

            if let Some(n) = classify(
                budget.category_id,
                name,
                spent,
                budget.amount,
                self.approaching_percent,
            ) {
                out.push(n);
            }
        }

        Ok(out)
    }
}

/// Exceeded when `spent >= limit`, else approaching when `spent` reaches
/// `approaching_percent` of `limit`, else nothing
pub fn classify(
    category_id: CategoryId,
    category: String,
    spent: Money,
    limit: Money,
    approaching_percent: u8,
) -> Option<Notification> {
    if spent >= limit {
        return Some(Notification::Exceeded {
            category_id,
            category,
            spent,
            limit,
        });
    }

    let reached = i128::from(spent.minor()) * 100
        >= i128::from(limit.minor()) * i128::from(approaching_percent);
    reached.then(|| Notification::Approaching {
        category_id,
        category,
        spent,
        limit,
    })
}

/// Unconditional prompt to log the day's expenses
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseLogReminderJob;

impl ReminderJob for ExpenseLogReminderJob {
    fn name(&self) -> &'static str {
        super::schedule::EXPENSE_REMINDER_JOB
    }

    fn notifications(&self, _storage: &Storage, _today: NaiveDate) -> PocketResult<Vec<Notification>> {
        Ok(vec![Notification::DailyLogReminder])
    }
}

/// Outcome of one job run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub job: &'static str,
    pub emitted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Run `job` once and deliver its notifications to `sink`
///
/// Each notification is delivered on its own; a failed delivery is logged
/// and counted. An `Err` means the job itself could not read the store.
pub fn run_job(
    job: &dyn ReminderJob,
    storage: &Storage,
    today: NaiveDate,
    sink: &mut dyn NotificationSink,
) -> PocketResult<JobReport> {
    let notifications = job.notifications(storage, today)?;
    let mut report = JobReport {
        job: job.name(),
        emitted: notifications.len(),
        ..JobReport::default()
    };

    for notification in &notifications {
        match sink.deliver(&notification.render()) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(job = job.name(), key = notification.key(), error = %e, "notification delivery failed");
            }
        }
    }

    tracing::debug!(job = report.job, emitted = report.emitted, failed = report.failed, "reminder job finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::PocketError;
    use crate::models::{Transaction, TransactionType};
    use crate::reminders::notification::RenderedNotification;
    use crate::reminders::MemorySink;

    fn create_test_storage() -> Storage {
        let storage = Storage::in_memory().unwrap();
        storage.bootstrap(&Settings::default()).unwrap();
        storage
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn category(storage: &Storage, name: &str) -> CategoryId {
        storage.categories.get_by_name(name).unwrap().unwrap().id
    }

    fn spend(storage: &Storage, category_id: CategoryId, cents: i64, date: NaiveDate) {
        let currency = storage.currencies.get_default().unwrap().unwrap();
        storage
            .transactions
            .insert(&Transaction::new(
                Money::from_minor(cents),
                TransactionType::Expense,
                category_id,
                date.and_hms_opt(12, 0, 0).unwrap(),
                currency.id,
            ))
            .unwrap();
    }

    fn budget(storage: &Storage, category_id: CategoryId, cents: i64, period: MonthPeriod) {
        storage
            .budgets
            .insert(&Budget::new(category_id, Money::from_minor(cents), period))
            .unwrap();
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn deliver(&mut self, _notification: &RenderedNotification) -> PocketResult<()> {
            Err(PocketError::Notification("tray unavailable".into()))
        }
    }

    #[test]
    fn test_classify_thresholds() {
        let food = CategoryId::new(1);
        let limit = Money::from_minor(10000);
        let check = |cents| classify(food, "Food".into(), Money::from_minor(cents), limit, 80);

        assert_eq!(check(7999), None);
        assert_eq!(check(8500).unwrap().title(), "Approaching Budget Limit");
        assert_eq!(check(8000).unwrap().title(), "Approaching Budget Limit");
        assert_eq!(check(10000).unwrap().title(), "Budget Exceeded");
        assert_eq!(check(25000).unwrap().title(), "Budget Exceeded");
    }

    #[test]
    fn test_threshold_job_emits_one_per_budget() {
        let storage = create_test_storage();
        let food = category(&storage, "Food");
        let bills = category(&storage, "Bills");
        let fun = category(&storage, "Entertainment");
        let march = MonthPeriod::from_date(today());

        budget(&storage, food, 10000, march);
        budget(&storage, bills, 10000, march);
        budget(&storage, fun, 10000, march);
        spend(&storage, food, 8500, today());
        spend(&storage, bills, 6000, today());
        spend(&storage, bills, 6000, today());
        spend(&storage, fun, 100, today());

        let mut sink = MemorySink::new();
        let report = run_job(&BudgetThresholdJob::default(), &storage, today(), &mut sink).unwrap();

        assert_eq!(report.emitted, 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(sink.get(food.get()).unwrap().title, "Approaching Budget Limit");
        assert_eq!(sink.get(bills.get()).unwrap().title, "Budget Exceeded");
        assert!(sink.get(fun.get()).is_none());
    }

    #[test]
    fn test_threshold_job_ignores_other_months() {
        let storage = create_test_storage();
        let food = category(&storage, "Food");
        budget(&storage, food, 10000, MonthPeriod::new(2025, 2).unwrap());
        spend(&storage, food, 50000, today());

        let notifications = BudgetThresholdJob::default()
            .notifications(&storage, today())
            .unwrap();
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_spend_scope() {
        let storage = create_test_storage();
        let food = category(&storage, "Food");
        budget(&storage, food, 10000, MonthPeriod::from_date(today()));
        // Last year's spending only counts in the all-time scope
        spend(&storage, food, 9000, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let all_time = BudgetThresholdJob::default();
        assert_eq!(all_time.notifications(&storage, today()).unwrap().len(), 1);

        let period_only = BudgetThresholdJob {
            scope: SpendScope::BudgetPeriod,
            ..all_time
        };
        assert!(period_only.notifications(&storage, today()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_category_uses_fallback_name() {
        let storage = create_test_storage();
        let ghost = CategoryId::new(42);
        budget(&storage, ghost, 100, MonthPeriod::from_date(today()));
        spend(&storage, ghost, 100, today());

        let notifications = BudgetThresholdJob::default()
            .notifications(&storage, today())
            .unwrap();
        assert_eq!(notifications[0].body(), "Category 42: Spent 1.00, Budget 1.00");
    }

    #[test]
    fn test_expense_reminder_is_unconditional() {
        let storage = Storage::in_memory().unwrap();
        let mut sink = MemorySink::new();
        let report = run_job(&ExpenseLogReminderJob, &storage, today(), &mut sink).unwrap();

        assert_eq!(report.job, "daily_expense_reminder");
        assert_eq!(report.delivered, 1);
        assert_eq!(sink.get(0).unwrap().title, "Daily Expense Reminder");
    }

    #[test]
    fn test_delivery_failures_are_counted() {
        let storage = create_test_storage();
        let food = category(&storage, "Food");
        let bills = category(&storage, "Bills");
        budget(&storage, food, 100, MonthPeriod::from_date(today()));
        budget(&storage, bills, 100, MonthPeriod::from_date(today()));
        spend(&storage, food, 100, today());
        spend(&storage, bills, 100, today());

        let report =
            run_job(&BudgetThresholdJob::default(), &storage, today(), &mut FailingSink).unwrap();
        assert_eq!(report.emitted, 2);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed, 2);
    }
}
