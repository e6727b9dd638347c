//! Error returned by the ledger engine and catalog service.

use thiserror::Error;

use stockledger_core::DomainError;

use crate::store::StoreError;

/// Typed failure of a ledger or catalog operation.
///
/// Every variant is a value handed back to the caller; a failed operation
/// leaves items and mutations exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount sign disagrees with the declared mutation type.
    #[error("invalid amount sign: {0}")]
    InvalidAmountSign(String),

    /// Applying the requested delta would make stock negative.
    #[error("insufficient stock: {0}")]
    InsufficientStock(String),

    /// An update supplied only one of type/amount.
    #[error("amount and type must be included together")]
    IncompleteAmountChange,

    /// Undoing a prior mutation's effect would make stock negative.
    #[error("revert underflow: {0}")]
    RevertUnderflow(String),

    /// A referenced item/mutation/user/category/location does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Field-level input validation failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The item stayed contended for every allowed attempt.
    #[error("item contended; gave up after {attempts} attempt(s)")]
    ContentionRetryExhausted { attempts: u32 },

    /// Unexpected storage failure.
    #[error("store failure: {0}")]
    Store(String),
}

impl LedgerError {
    /// Business-rule and input failures, as opposed to lookups and infrastructure.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmountSign(_)
                | LedgerError::InsufficientStock(_)
                | LedgerError::IncompleteAmountChange
                | LedgerError::RevertUnderflow(_)
                | LedgerError::Validation(_)
        )
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LedgerError::Validation(msg),
            DomainError::InvalidAmountSign(msg) => LedgerError::InvalidAmountSign(msg),
            DomainError::InsufficientStock(msg) => LedgerError::InsufficientStock(msg),
            DomainError::IncompleteAmountChange => LedgerError::IncompleteAmountChange,
            DomainError::RevertUnderflow(msg) => LedgerError::RevertUnderflow(msg),
            DomainError::InvalidId(msg) => LedgerError::Validation(msg),
            DomainError::NotFound(entity) => LedgerError::NotFound(entity),
            DomainError::Conflict(msg) => LedgerError::Store(msg),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(entity) => LedgerError::NotFound(entity),
            StoreError::Duplicate(what) => {
                LedgerError::Validation(format!("{what} has already been taken"))
            }
            StoreError::Conflict(msg)
            | StoreError::InvalidWrite(msg)
            | StoreError::Unavailable(msg) => LedgerError::Store(msg),
        }
    }
}
