//! Chain-facing layer for Safe multisig wallets: contract interfaces, typed
//! reads, MultiSend batching and signature verification.

pub mod batch;
pub mod calls;
pub mod contracts;
pub mod provider;
pub mod transaction_data;
pub mod verify;

mod error;

pub use error::SafeCallError;
