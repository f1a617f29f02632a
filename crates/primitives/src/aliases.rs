use alloy_primitives::B256;

/// A Safe transaction hash as returned by the wallet contract's
/// `getTransactionHash`. Acts as the primary key of a transaction record.
pub type SafeTransactionHash = B256;

/// The chain id of the network a Safe is deployed on.
pub type ChainId = u64;
