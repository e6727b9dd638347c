//! Infrastructure layer: entity storage, item locking, and the stock ledger engine.

pub mod catalog;
pub mod error;
pub mod ledger_engine;
pub mod locks;
pub mod retry;
pub mod store;
pub mod transaction;

use std::sync::Arc;
use std::time::Duration;

pub use catalog::CatalogService;
pub use error::LedgerError;
pub use ledger_engine::{Reconciliation, StockLedger};
pub use locks::{ItemLockGuard, ItemLocks, LockError};
pub use retry::{BackoffStrategy, RetryPolicy, UnknownBackoffStrategy};
pub use store::{EntityStore, InMemoryStore, StoreError};
pub use transaction::ItemTransactions;

/// Concurrency settings shared by the ledger engine and catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Longest wait for an item lock before the attempt counts as contended.
    pub lock_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(250),
            retry: RetryPolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Build the ledger engine and catalog service over one store, sharing
    /// the same item locks.
    pub fn build<S: Clone>(self, store: S) -> (StockLedger<S>, CatalogService<S>) {
        let locks = Arc::new(ItemLocks::new(self.lock_timeout));
        let tx = ItemTransactions::new(locks, self.retry);
        (
            StockLedger::new(store.clone(), tx.clone()),
            CatalogService::new(store, tx),
        )
    }
}
