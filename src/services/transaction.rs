//! Transaction service
//!
//! Validates input before it reaches the store: the amount must be positive,
//! the category must exist and its type decides the transaction type.

use chrono::NaiveDateTime;

use crate::error::{PocketError, PocketResult};
use crate::models::{
    Category, CategoryId, CurrencyId, Money, MonthPeriod, Transaction, TransactionId,
    TransactionType,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub period: Option<MonthPeriod>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: MonthPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub amount: Money,
    /// Must agree with the category's type when given
    pub transaction_type: Option<TransactionType>,
    pub category_id: CategoryId,
    pub date: NaiveDateTime,
    pub note: Option<String>,
    /// Defaults to the default currency
    pub currency_id: Option<CurrencyId>,
}

/// Fields to change on an existing transaction; `None` keeps the old value
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub amount: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDateTime>,
    /// `Some(None)` clears the note
    pub note: Option<Option<String>>,
    pub currency_id: Option<CurrencyId>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> PocketResult<Transaction> {
        let category = self.require_category(input.category_id)?;

        let transaction_type = input.transaction_type.unwrap_or(category.category_type);
        if transaction_type != category.category_type {
            return Err(PocketError::Validation(format!(
                "Category '{}' is an {} category",
                category.name,
                category.category_type.to_string().to_lowercase()
            )));
        }

        let currency_id = match input.currency_id {
            Some(id) => self.require_currency(id)?,
            None => self.default_currency_id()?,
        };

        let mut txn = Transaction::new(
            input.amount,
            transaction_type,
            category.id,
            input.date,
            currency_id,
        );
        if let Some(note) = input.note {
            txn = txn.with_note(note);
        }

        txn.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        txn.id = self.storage.transactions.insert(&txn)?;
        self.storage.log_create(&txn)?;

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> PocketResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Get a transaction by ID or fail with "not found"
    pub fn require(&self, id: TransactionId) -> PocketResult<Transaction> {
        self.get(id)?
            .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> PocketResult<Vec<Transaction>> {
        let transactions = match filter.period {
            Some(period) => self.storage.transactions.get_in_period(period)?,
            None => self.storage.transactions.get_all()?,
        };

        let filtered = transactions
            .into_iter()
            .filter(|t| filter.category_id.map_or(true, |c| t.category_id == c))
            .filter(|t| {
                filter
                    .transaction_type
                    .map_or(true, |ty| t.transaction_type == ty)
            });

        Ok(match filter.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        })
    }

    /// Transactions dated inside `period`, newest first
    pub fn list_for_period(&self, period: MonthPeriod) -> PocketResult<Vec<Transaction>> {
        self.list(TransactionFilter::new().period(period))
    }

    /// Apply `input` to an existing transaction
    ///
    /// Moving a transaction to a category of the other type flips its type.
    pub fn update(&self, id: TransactionId, input: UpdateTransactionInput) -> PocketResult<Transaction> {
        let before = self.require(id)?;
        let mut txn = before.clone();

        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(category_id) = input.category_id {
            let category = self.require_category(category_id)?;
            txn.category_id = category.id;
            txn.transaction_type = category.category_type;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(note) = input.note {
            txn.note = note.filter(|n| !n.trim().is_empty());
        }
        if let Some(currency_id) = input.currency_id {
            txn.currency_id = self.require_currency(currency_id)?;
        }

        txn.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        if txn == before {
            return Ok(txn);
        }

        if !self.storage.transactions.update(&txn)? {
            return Err(PocketError::transaction_not_found(id.to_string()));
        }
        self.storage.log_update(&before, &txn)?;

        Ok(txn)
    }

    /// Delete a transaction, returning what was removed
    pub fn delete(&self, id: TransactionId) -> PocketResult<Transaction> {
        let txn = self.require(id)?;

        self.storage.transactions.delete(id)?;
        self.storage.log_delete(&txn)?;

        Ok(txn)
    }

    fn require_category(&self, id: CategoryId) -> PocketResult<Category> {
        if !id.is_assigned() {
            return Err(PocketError::Validation("Select a valid category".into()));
        }
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| PocketError::Validation(format!("Category {} does not exist", id)))
    }

    fn require_currency(&self, id: CurrencyId) -> PocketResult<CurrencyId> {
        self.storage
            .currencies
            .get(id)?
            .map(|c| c.id)
            .ok_or_else(|| PocketError::currency_not_found(id.to_string()))
    }

    fn default_currency_id(&self) -> PocketResult<CurrencyId> {
        self.storage
            .currencies
            .get_default()?
            .map(|c| c.id)
            .ok_or_else(|| PocketError::currency_not_found("default"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chrono::NaiveDate;

    fn create_test_storage() -> Storage {
        let storage = Storage::in_memory().unwrap();
        storage.bootstrap(&Settings::default()).unwrap();
        storage
    }

    fn category_id(storage: &Storage, name: &str) -> CategoryId {
        storage.categories.get_by_name(name).unwrap().unwrap().id
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn input(amount: &str, category_id: CategoryId, date: NaiveDateTime) -> CreateTransactionInput {
        CreateTransactionInput {
            amount: Money::parse(amount).unwrap(),
            transaction_type: None,
            category_id,
            date,
            note: None,
            currency_id: None,
        }
    }

    #[test]
    fn test_create_transaction() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");

        let txn = service
            .create(CreateTransactionInput {
                note: Some("groceries".into()),
                ..input("42.50", food, at(2025, 3, 10))
            })
            .unwrap();

        assert!(txn.id.is_assigned());
        assert_eq!(txn.transaction_type, TransactionType::Expense);
        assert_eq!(
            txn.currency_id,
            storage.currencies.get_default().unwrap().unwrap().id
        );

        let stored = service.require(txn.id).unwrap();
        assert_eq!(stored, txn);
    }

    #[test]
    fn test_create_rejects_non_positive_amount() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");

        let err = service.create(input("0", food, at(2025, 3, 1))).unwrap_err();
        assert!(err.is_validation());
        assert!(storage.transactions.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .create(input("10", CategoryId::new(999), at(2025, 3, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(input("10", CategoryId::default(), at(2025, 3, 1)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_rejects_type_mismatch() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let salary = category_id(&storage, "Salary");

        let err = service
            .create(CreateTransactionInput {
                transaction_type: Some(TransactionType::Expense),
                ..input("10", salary, at(2025, 3, 1))
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_list_with_period_and_limit() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");
        let salary = category_id(&storage, "Salary");

        service.create(input("10", food, at(2025, 3, 1))).unwrap();
        service.create(input("20", food, at(2025, 3, 2))).unwrap();
        service.create(input("1000", salary, at(2025, 3, 3))).unwrap();
        service.create(input("30", food, at(2025, 4, 1))).unwrap();

        let march = MonthPeriod::new(2025, 3).unwrap();
        assert_eq!(service.list_for_period(march).unwrap().len(), 3);

        let expenses = service
            .list(
                TransactionFilter::new()
                    .period(march)
                    .transaction_type(TransactionType::Expense),
            )
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let latest = service.list(TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(latest[0].amount, Money::from_major_minor(30, 0));
    }

    #[test]
    fn test_update_transaction() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");
        let salary = category_id(&storage, "Salary");

        let txn = service
            .create(CreateTransactionInput {
                note: Some("lunch".into()),
                ..input("10", food, at(2025, 3, 1))
            })
            .unwrap();

        let updated = service
            .update(
                txn.id,
                UpdateTransactionInput {
                    amount: Some(Money::from_major_minor(12, 50)),
                    note: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.minor(), 1250);
        assert_eq!(updated.note, None);

        let moved = service
            .update(
                txn.id,
                UpdateTransactionInput {
                    category_id: Some(salary),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.transaction_type, TransactionType::Income);
        assert_eq!(service.require(txn.id).unwrap(), moved);
    }

    #[test]
    fn test_update_rejects_zero_amount() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");
        let txn = service.create(input("10", food, at(2025, 3, 1))).unwrap();

        let err = service
            .update(
                txn.id,
                UpdateTransactionInput {
                    amount: Some(Money::zero()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.require(txn.id).unwrap().amount.minor(), 1000);
    }

    #[test]
    fn test_delete_transaction() {
        let storage = create_test_storage();
        let service = TransactionService::new(&storage);
        let food = category_id(&storage, "Food");
        let txn = service.create(input("10", food, at(2025, 3, 1))).unwrap();

        let deleted = service.delete(txn.id).unwrap();
        assert_eq!(deleted.id, txn.id);
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }
}
