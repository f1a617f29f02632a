use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum SafeCallError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("abi decode error: {0}")]
    Decode(#[from] alloy_sol_types::Error),
}
