use alloy_dyn_abi::{JsonAbiExt, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes, U256};
use poolsafe_primitives::consts;
use poolsafe_store::TransactionKind;
use safe_multisig::{
    batch::{encode_multi_send, BatchCall},
    calls,
    provider::EvmProvider,
    transaction_data::{OperationType, SafeTransactionData},
};
use serde::Deserialize;

use std::collections::BTreeMap;

use crate::error::CoordinatorError;

/// The target call of a proposal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum CallSpec {
    /// A single contract call given as a function signature plus
    /// human-readable arguments, ABI-encoded by the builder.
    Call {
        to: Address,
        signature: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        value: U256,
    },
    /// An explicit descriptor with pre-encoded calldata.
    Raw {
        to: Address,
        #[serde(default)]
        value: U256,
        data: Bytes,
    },
    /// Multiple calls aggregated through the chain's MultiSend contract.
    /// An empty batch is valid and produces a no-op descriptor.
    Batch { calls: Vec<BatchCallSpec> },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCallSpec {
    pub to: Address,
    #[serde(default)]
    pub value: U256,
    pub data: Bytes,
    #[serde(default)]
    pub delegate: bool,
}

/// Input of `propose_transaction`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeRequest {
    pub safe_address: Address,
    pub chain_id: u64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub call: CallSpec,
    pub created_by: String,
}

/// Builds the canonical descriptor for a call spec. The wallet nonce is a
/// fresh read, not a reservation: two concurrent proposals may observe the
/// same nonce, and the wallet contract resolves the race at execution.
pub(crate) async fn build_transaction(
    call: &CallSpec,
    safe: Address,
    chain_id: u64,
    provider: &dyn EvmProvider,
) -> Result<SafeTransactionData, CoordinatorError> {
    let (to, value, data, operation) = match call {
        CallSpec::Call { to, signature, args, value } => {
            (*to, *value, encode_call(signature, args)?, OperationType::Call)
        }
        CallSpec::Raw { to, value, data } => (*to, *value, data.clone(), OperationType::Call),
        CallSpec::Batch { calls } => {
            let multi_send = consts::get_multi_send(chain_id)
                .map_err(|e| CoordinatorError::InvalidCall(e.to_string()))?;

            let batch: Vec<BatchCall> = calls
                .iter()
                .map(|call| BatchCall {
                    to: call.to,
                    value: call.value,
                    data: call.data.clone(),
                    operation: if call.delegate {
                        OperationType::DelegateCall
                    } else {
                        OperationType::Call
                    },
                })
                .collect();

            (multi_send, U256::ZERO, encode_multi_send(&batch), OperationType::DelegateCall)
        }
    };

    let nonce = calls::get_nonce(safe, provider).await?;

    Ok(SafeTransactionData::new(to, value, data, operation, nonce))
}

fn encode_call(signature: &str, args: &[String]) -> Result<Bytes, CoordinatorError> {
    let function =
        Function::parse(signature).map_err(|e| CoordinatorError::InvalidCall(e.to_string()))?;

    if function.inputs.len() != args.len() {
        return Err(CoordinatorError::InvalidCall(format!(
            "{} takes {} arguments, got {}",
            function.name,
            function.inputs.len(),
            args.len()
        )));
    }

    let values = function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            param
                .resolve()
                .and_then(|ty| ty.coerce_str(arg))
                .map_err(|e| CoordinatorError::InvalidCall(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    function
        .abi_encode_input(&values)
        .map(Into::into)
        .map_err(|e| CoordinatorError::InvalidCall(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_function_signature_with_args() {
        let data = encode_call(
            "transfer(address,uint256)",
            &[
                "0x00000000000000000000000000000000000000aa".to_string(),
                "1000".to_string(),
            ],
        )
        .unwrap();

        // selector + two words
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn arity_mismatch_is_an_invalid_call() {
        let err = encode_call("transfer(address,uint256)", &["0x1234".to_string()]).unwrap_err();
        assert_eq!(err.code(), "invalid-call");
    }

    #[test]
    fn malformed_signature_is_an_invalid_call() {
        let err = encode_call("not a signature", &[]).unwrap_err();
        assert_eq!(err.code(), "invalid-call");
    }
}
