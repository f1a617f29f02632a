use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{contracts::multi_send::MultiSend, transaction_data::OperationType};

/// One call inside a MultiSend batch.
#[derive(Debug, Clone)]
pub struct BatchCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
}

/// Packs the batch into the MultiSend wire layout and wraps it into
/// `multiSend(bytes)` calldata. The layout per call is:
/// operation (1 byte) | to (20 bytes) | value (32 bytes) |
/// data length (32 bytes) | data
///
/// An empty batch is valid and yields a no-op `multiSend` call.
pub fn encode_multi_send(calls: &[BatchCall]) -> Bytes {
    let mut packed = Vec::new();

    for call in calls {
        packed.push(u8::from(call.operation));
        packed.extend_from_slice(call.to.as_slice());
        packed.extend_from_slice(&call.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&call.data);
    }

    let call = MultiSend::multiSendCall::new((Bytes::from(packed),));

    call.abi_encode().into()
}
