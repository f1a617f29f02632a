use alloy_primitives::{Address, B256};
use poolsafe_store::{StateError, StoreError};
use safe_multisig::{provider::ProviderError, SafeCallError};

/// The single error surface of the coordinator. Every variant carries a
/// stable machine-readable code for client branch/retry logic; the display
/// string is the human-readable side.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid call spec: {0}")]
    InvalidCall(String),

    #[error("transaction {0} not found")]
    NotFound(B256),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("{signer} is not an owner of {safe}")]
    NotAnOwner { signer: Address, safe: Address },

    #[error("signature verification failed: {reason}")]
    InvalidSignature { reason: String },

    #[error("insufficient signatures: {current} of {required}")]
    InsufficientSignatures { current: u32, required: u32 },

    #[error("wallet misconfigured: {0}")]
    WalletMisconfigured(String),

    #[error("execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("chain provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("safe call error: {0}")]
    SafeCall(#[from] SafeCallError),

    #[error("store backend error: {0}")]
    Store(String),
}

impl CoordinatorError {
    /// Stable machine-readable code. Clients branch on this, never on the
    /// display string.
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::InvalidHash(_) => "invalid-hash",
            CoordinatorError::InvalidAddress(_) => "invalid-address",
            CoordinatorError::InvalidCall(_) => "invalid-call",
            CoordinatorError::NotFound(_) => "not-found",
            CoordinatorError::State(StateError::NotPending(_)) => "not-pending",
            CoordinatorError::State(StateError::AlreadySigned(_)) => "already-signed",
            CoordinatorError::State(StateError::AlreadyExecuted) => "already-executed",
            CoordinatorError::State(StateError::NotReady(_)) => "not-ready",
            CoordinatorError::State(StateError::Expired) => "expired",
            CoordinatorError::NotAnOwner { .. } => "not-an-owner",
            CoordinatorError::InvalidSignature { .. } => "invalid-signature",
            CoordinatorError::InsufficientSignatures { .. } => "insufficient-signatures",
            CoordinatorError::WalletMisconfigured(_) => "wallet-misconfigured",
            CoordinatorError::ExecutionFailed { .. } => "execution-failed",
            CoordinatorError::Provider(_) => "provider-error",
            CoordinatorError::SafeCall(_) => "provider-error",
            CoordinatorError::Store(_) => "store-error",
        }
    }

    /// Whether a client may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoordinatorError::Provider(_)
                | CoordinatorError::SafeCall(_)
                | CoordinatorError::Store(_)
        )
    }
}

impl From<StoreError> for CoordinatorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(hash) => CoordinatorError::NotFound(hash),
            StoreError::State(state) => CoordinatorError::State(state),
            StoreError::Backend(msg) => CoordinatorError::Store(msg),
        }
    }
}
