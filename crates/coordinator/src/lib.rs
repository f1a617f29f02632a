//! Multisig transaction coordination: proposal building, signature
//! collection and on-chain execution against a Safe wallet.
//!
//! The [`MultisigService`] facade exposes the five caller-facing
//! operations; all chain access goes through
//! [`safe_multisig::provider::EvmProvider`] and all persistence through
//! [`poolsafe_store::TransactionStore`], so both are injectable.

mod collector;
mod error;
mod executor;
mod proposal;
mod service;

pub use collector::SignatureStatus;
pub use error::CoordinatorError;
pub use executor::ExecutionResult;
pub use proposal::{BatchCallSpec, CallSpec, ProposeRequest};
pub use service::MultisigService;
