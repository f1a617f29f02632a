use alloy_primitives::{Address, B256};

use crate::record::TransactionStatus;

/// Rejected state transitions. Each variant is a distinct condition so
/// callers can branch ("already signed" is not "not pending").
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("transaction is {0}, signatures are only accepted while pending")]
    NotPending(TransactionStatus),

    #[error("{0} has already signed this transaction")]
    AlreadySigned(Address),

    #[error("transaction has already been executed")]
    AlreadyExecuted,

    #[error("transaction is {0}, not ready to execute")]
    NotReady(TransactionStatus),

    #[error("transaction expired before reaching quorum")]
    Expired,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(B256),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("store backend error: {0}")]
    Backend(String),
}
