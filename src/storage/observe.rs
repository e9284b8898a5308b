//! Change notification for observable reads
//!
//! A subscriber registers interest in one or more tables. After every
//! committed write touching one of those tables its callback runs again and
//! re-reads the full result set. Dropping the [`Subscription`] unregisters it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// The four persisted tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Transactions,
    Categories,
    Budgets,
    Currencies,
}

impl Table {
    pub fn all() -> &'static [Table] {
        &[
            Table::Transactions,
            Table::Categories,
            Table::Budgets,
            Table::Currencies,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Transactions => "transactions",
            Table::Categories => "categories",
            Table::Budgets => "budgets",
            Table::Currencies => "currencies",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type Listener = Arc<dyn Fn() + Send + Sync>;

struct Registration {
    table: Table,
    listener: Listener,
}

/// Registry of table listeners shared by every repository of one database
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, Registration>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for changes to `table`
    pub fn register(self: &Arc<Self>, table: Table, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(id, Registration { table, listener });
        }
        Subscription {
            id,
            notifier: Arc::downgrade(self),
        }
    }

    /// Run every listener registered for `table`
    ///
    /// Listeners are collected first and invoked without holding the registry
    /// lock, so a listener may subscribe or cancel.
    pub fn notify(&self, table: Table) {
        let to_call: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners
                .values()
                .filter(|r| r.table == table)
                .map(|r| Arc::clone(&r.listener))
                .collect(),
            Err(_) => return,
        };

        tracing::debug!(table = %table, listeners = to_call.len(), "notifying observers");

        for listener in to_call {
            listener();
        }
    }

    /// Notify once per distinct table
    pub fn notify_all(&self, tables: &[Table]) {
        let mut seen = Vec::with_capacity(tables.len());
        for table in tables {
            if !seen.contains(table) {
                seen.push(*table);
                self.notify(*table);
            }
        }
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn unregister(&self, id: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.remove(&id);
        }
    }
}

/// Handle for an observable read; the callback stops when this is dropped
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    id: u64,
    notifier: Weak<ChangeNotifier>,
}

impl Subscription {
    /// Stop receiving updates
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(notifier) = self.notifier.upgrade() {
            notifier.unregister(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
