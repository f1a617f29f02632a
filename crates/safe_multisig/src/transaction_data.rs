use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// How the Safe performs the inner call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Call = 0,
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(operation: OperationType) -> u8 {
        operation as u8
    }
}

/// The full descriptor of a Safe transaction, as hashed and executed by the
/// wallet contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
}

impl SafeTransactionData {
    /// A descriptor with zeroed gas parameters, the defaults used for
    /// coordinator-proposed transactions.
    pub fn new(to: Address, value: U256, data: Bytes, operation: OperationType, nonce: U256) -> Self {
        Self {
            to,
            value,
            data,
            operation,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce,
        }
    }
}

/// `execTransaction` calldata ready for submission to the wallet.
#[derive(Debug, Clone)]
pub struct ExecutableSafeTransaction {
    pub safe_address: Address,
    pub input_data: Bytes,
}
