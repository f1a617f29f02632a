use addresses::{holesky, mainnet, sepolia};
use alloy_primitives::Address;

use std::str::FromStr;

/// Safe versions the coordinator accepts when verifying signatures.
pub const SUPPORTED_SAFE_VERSIONS: &[&str] = &["1.1.1", "1.2.0", "1.3.0", "1.4.1"];

/// How long a proposed transaction stays signable before it is lazily expired.
pub const TRANSACTION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

pub mod addresses {
    pub mod mainnet {
        pub const CHAIN_ID: u64 = 1;

        /// Canonical MultiSend v1.3.0 (batched calls, delegatecall target)
        pub const MULTI_SEND: &str = "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761";

        /// Canonical MultiSendCallOnly v1.3.0
        pub const MULTI_SEND_CALL_ONLY: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";

        /// Lending pool factory managed by the platform Safe
        pub const POOL_FACTORY: &str = "0x68b3465833fb72A70ecDF485E0e4C7bD8665Fc45";
    }

    pub mod holesky {
        pub const CHAIN_ID: u64 = 17000;

        /// Canonical MultiSend v1.3.0 (batched calls, delegatecall target)
        pub const MULTI_SEND: &str = "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761";

        /// Canonical MultiSendCallOnly v1.3.0
        pub const MULTI_SEND_CALL_ONLY: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";

        /// Lending pool factory managed by the platform Safe
        pub const POOL_FACTORY: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";
    }

    pub mod sepolia {
        pub const CHAIN_ID: u64 = 11155111;

        /// Canonical MultiSend v1.3.0 (batched calls, delegatecall target)
        pub const MULTI_SEND: &str = "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761";

        /// Canonical MultiSendCallOnly v1.3.0
        pub const MULTI_SEND_CALL_ONLY: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";

        /// Lending pool factory managed by the platform Safe
        pub const POOL_FACTORY: &str = "0x0227628f3F023bb0B980b67D528571c95c6DaC1c";
    }
}

pub fn get_multi_send(chain_id: u64) -> eyre::Result<Address> {
    match chain_id {
        mainnet::CHAIN_ID => Ok(Address::from_str(mainnet::MULTI_SEND)?),
        holesky::CHAIN_ID => Ok(Address::from_str(holesky::MULTI_SEND)?),
        sepolia::CHAIN_ID => Ok(Address::from_str(sepolia::MULTI_SEND)?),
        _ => Err(eyre::eyre!("Chain ID not supported")),
    }
}

pub fn get_multi_send_call_only(chain_id: u64) -> eyre::Result<Address> {
    match chain_id {
        mainnet::CHAIN_ID => Ok(Address::from_str(mainnet::MULTI_SEND_CALL_ONLY)?),
        holesky::CHAIN_ID => Ok(Address::from_str(holesky::MULTI_SEND_CALL_ONLY)?),
        sepolia::CHAIN_ID => Ok(Address::from_str(sepolia::MULTI_SEND_CALL_ONLY)?),
        _ => Err(eyre::eyre!("Chain ID not supported")),
    }
}

pub fn get_pool_factory(chain_id: u64) -> eyre::Result<Address> {
    match chain_id {
        mainnet::CHAIN_ID => Ok(Address::from_str(mainnet::POOL_FACTORY)?),
        holesky::CHAIN_ID => Ok(Address::from_str(holesky::POOL_FACTORY)?),
        sepolia::CHAIN_ID => Ok(Address::from_str(sepolia::POOL_FACTORY)?),
        _ => Err(eyre::eyre!("Chain ID not supported")),
    }
}

pub fn is_supported_safe_version(version: &str) -> bool {
    SUPPORTED_SAFE_VERSIONS.contains(&version)
}
