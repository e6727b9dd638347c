//! Serialized per-item transactions.
//!
//! A transaction body runs while holding the item's lock and ends in a
//! versioned store write. Lock timeouts and version conflicts are treated as
//! contention: the body is re-run from scratch (reload, re-plan, re-write)
//! until the retry policy runs out.

use std::sync::Arc;
use std::thread;

use stockledger_core::{DomainError, ItemId};

use crate::error::LedgerError;
use crate::locks::ItemLocks;
use crate::retry::RetryPolicy;
use crate::store::StoreError;

/// Outcome of one attempt of a transaction body.
#[derive(Debug)]
pub(crate) enum Step {
    /// Worth retrying: the item changed underneath or the lock was busy.
    Contended(String),
    Failed(LedgerError),
}

impl From<StoreError> for Step {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => Step::Contended(msg),
            other => Step::Failed(other.into()),
        }
    }
}

impl From<DomainError> for Step {
    fn from(value: DomainError) -> Self {
        Step::Failed(value.into())
    }
}

impl From<LedgerError> for Step {
    fn from(value: LedgerError) -> Self {
        Step::Failed(value)
    }
}

/// Runs transaction bodies under per-item locks with bounded retries.
#[derive(Debug, Clone)]
pub struct ItemTransactions {
    locks: Arc<ItemLocks>,
    retry: RetryPolicy,
}

impl ItemTransactions {
    pub fn new(locks: Arc<ItemLocks>, retry: RetryPolicy) -> Self {
        Self { locks, retry }
    }

    pub(crate) fn run<T>(
        &self,
        item_id: ItemId,
        op: &'static str,
        mut body: impl FnMut() -> Result<T, Step>,
    ) -> Result<T, LedgerError> {
        let attempts = self.retry.attempts();

        for attempt in 1..=attempts {
            let step = match self.locks.acquire(item_id) {
                Ok(_guard) => body(),
                Err(e) => Err(Step::Contended(e.to_string())),
            };

            match step {
                Ok(value) => return Ok(value),
                Err(Step::Failed(e)) => {
                    if e.is_rule_violation() {
                        tracing::warn!(%item_id, op, error = %e, "rejected");
                    }
                    return Err(e);
                }
                Err(Step::Contended(reason)) => {
                    tracing::warn!(%item_id, op, attempt, %reason, "item contended");
                    if attempt < attempts {
                        thread::sleep(self.retry.delay_for_attempt(attempt));
                    }
                }
            }
        }

        Err(LedgerError::ContentionRetryExhausted { attempts })
    }
}
