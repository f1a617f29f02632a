use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::SolCall;

use crate::{
    contracts::safe::Safe,
    error::SafeCallError,
    provider::EvmProvider,
    transaction_data::{ExecutableSafeTransaction, SafeTransactionData},
};

pub async fn get_nonce(
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<U256, SafeCallError> {
    let call = Safe::nonceCall::new(());

    let Safe::nonceReturn { _0: nonce } = call_and_decode(call, safe, provider).await?;

    Ok(nonce)
}

pub async fn get_owners(
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<Vec<Address>, SafeCallError> {
    let call = Safe::getOwnersCall::new(());

    let Safe::getOwnersReturn { _0: owners } = call_and_decode(call, safe, provider).await?;

    Ok(owners)
}

pub async fn get_threshold(
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<U256, SafeCallError> {
    let call = Safe::getThresholdCall::new(());

    let Safe::getThresholdReturn { _0: threshold } = call_and_decode(call, safe, provider).await?;

    Ok(threshold)
}

pub async fn get_version(
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<String, SafeCallError> {
    let call = Safe::VERSIONCall::new(());

    let Safe::VERSIONReturn { _0: version } = call_and_decode(call, safe, provider).await?;

    Ok(version)
}

pub async fn is_owner(
    address: Address,
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<bool, SafeCallError> {
    let call = Safe::isOwnerCall::new((address,));

    let Safe::isOwnerReturn { _0: is_owner } = call_and_decode(call, safe, provider).await?;

    Ok(is_owner)
}

/// Computes the transaction hash by asking the wallet contract itself, so
/// the hash always matches what owners sign and what `execTransaction`
/// verifies.
pub async fn get_transaction_hash(
    safe_tx: &SafeTransactionData,
    safe: Address,
    provider: &dyn EvmProvider,
) -> Result<B256, SafeCallError> {
    let call = Safe::getTransactionHashCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.into(),
        safe_tx.safe_tx_gas,
        safe_tx.base_gas,
        safe_tx.gas_price,
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        safe_tx.nonce,
    ));

    let Safe::getTransactionHashReturn { _0: tx_hash } =
        call_and_decode(call, safe, provider).await?;

    Ok(tx_hash)
}

/// EIP-1271 validation entry point on a contract signer.
pub async fn is_valid_signature(
    signer_contract: Address,
    data_hash: B256,
    signature: &[u8],
    provider: &dyn EvmProvider,
) -> Result<FixedBytes<4>, SafeCallError> {
    let call =
        Safe::isValidSignatureCall::new((data_hash, Bytes::copy_from_slice(signature)));

    let Safe::isValidSignatureReturn { _0: magic } =
        call_and_decode(call, signer_contract, provider).await?;

    Ok(magic)
}

/// Builds `execTransaction` calldata for a fully signed transaction. The
/// signature bundle must already be sorted ascending by signer address.
pub fn exec_transaction(
    safe_tx: &SafeTransactionData,
    signatures: &[u8],
    safe: Address,
) -> ExecutableSafeTransaction {
    let call = Safe::execTransactionCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.into(),
        safe_tx.safe_tx_gas,
        safe_tx.base_gas,
        safe_tx.gas_price,
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        Bytes::copy_from_slice(signatures),
    ));

    ExecutableSafeTransaction { safe_address: safe, input_data: call.abi_encode().into() }
}

async fn call_and_decode<C: SolCall>(
    call: C,
    to: Address,
    provider: &dyn EvmProvider,
) -> Result<C::Return, SafeCallError> {
    let call_data: Vec<u8> = call.abi_encode();

    let data = provider.call(to, call_data.into()).await?;
    let data = C::abi_decode_returns(data.as_ref(), true)?;

    Ok(data)
}
