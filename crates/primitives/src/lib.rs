pub use alloy_primitives;

pub mod aliases;

/// Constants and per-chain contract addresses used by the coordinator
pub mod consts;
