use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use chrono::Utc;
use poolsafe_store::{
    ExecutionInfo, StateError, TransactionKind, TransactionStatus,
};
use safe_multisig::{
    calls,
    contracts::pool_factory::PoolFactory,
    provider::LogRecord,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{error::CoordinatorError, service::parse_tx_hash, MultisigService};

/// Outcome of a confirmed execution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub transaction_hash: B256,
    pub status: TransactionStatus,
    pub execution_tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u128,
    pub pool_id: Option<U256>,
    pub pool_address: Option<Address>,
}

impl MultisigService {
    /// Submits a ready transaction to the wallet contract and records the
    /// outcome. Every failure past submission is durably recorded as
    /// `failed` before being surfaced, so the stored state is never left
    /// ambiguous.
    pub async fn execute_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<ExecutionResult, CoordinatorError> {
        let hash = parse_tx_hash(tx_hash)?;
        let now = Utc::now();

        let record = self
            .store
            .get(&hash)
            .await
            .map_err(CoordinatorError::from)?
            .ok_or(CoordinatorError::NotFound(hash))?;

        match record.status {
            TransactionStatus::ReadyToExecute => {}
            TransactionStatus::Executed => return Err(StateError::AlreadyExecuted.into()),
            status => return Err(StateError::NotReady(status).into()),
        }

        // The store should never hold a ready record below quorum; check
        // anyway before touching the chain.
        let collected = record.signatures.len() as u32;
        if collected < record.required_signatures {
            return Err(CoordinatorError::InsufficientSignatures {
                current: collected,
                required: record.required_signatures,
            });
        }

        // The wallet contract requires signatures in ascending signer
        // order, regardless of submission order.
        let mut entries = record.signatures.clone();
        entries.sort_by(|a, b| a.signer.cmp(&b.signer));
        let mut bundle = Vec::with_capacity(entries.len() * 65);
        for entry in &entries {
            bundle.extend_from_slice(&entry.data);
        }

        let executable = calls::exec_transaction(&record.tx, &bundle, record.safe_address);

        let execution_tx_hash = match self
            .provider
            .send_transaction(executable.safe_address, executable.input_data, U256::ZERO)
            .await
        {
            Ok(execution_tx_hash) => execution_tx_hash,
            Err(e) => {
                self.store.fail_execution(&hash, e.to_string(), None, now).await?;
                return Err(CoordinatorError::Provider(e));
            }
        };

        let receipt = match self.provider.wait_for_receipt(execution_tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                let partial = ExecutionInfo {
                    execution_tx_hash: Some(execution_tx_hash),
                    ..Default::default()
                };
                self.store.fail_execution(&hash, e.to_string(), Some(partial), now).await?;
                return Err(CoordinatorError::Provider(e));
            }
        };

        if !receipt.status {
            let reason = "execution reverted on-chain".to_string();
            let partial = ExecutionInfo {
                execution_tx_hash: Some(receipt.tx_hash),
                block_number: receipt.block_number,
                gas_used: Some(receipt.gas_used),
                ..Default::default()
            };
            self.store.fail_execution(&hash, reason.clone(), Some(partial), now).await?;
            return Err(CoordinatorError::ExecutionFailed { reason });
        }

        let mut info = ExecutionInfo {
            execution_tx_hash: Some(receipt.tx_hash),
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used),
            pool_id: None,
            pool_address: None,
        };

        // The on-chain effect is authoritative; a missing or unparseable
        // event only costs us the result fields.
        if record.kind == TransactionKind::PoolCreation {
            match parse_pool_created(&receipt.logs) {
                Some((pool_id, pool_address)) => {
                    info.pool_id = Some(pool_id);
                    info.pool_address = Some(pool_address);
                }
                None => {
                    warn!(tx_hash = %hash, "execution confirmed but no PoolCreated event found");
                }
            }
        }

        let updated = self.store.complete_execution(&hash, info.clone(), now).await?;
        info!(
            tx_hash = %hash,
            execution_tx_hash = %receipt.tx_hash,
            block_number = ?receipt.block_number,
            "multisig transaction executed"
        );

        Ok(ExecutionResult {
            transaction_hash: hash,
            status: updated.status,
            execution_tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            pool_id: info.pool_id,
            pool_address: info.pool_address,
        })
    }
}

fn parse_pool_created(logs: &[LogRecord]) -> Option<(U256, Address)> {
    for log in logs {
        if let Ok(event) =
            PoolFactory::PoolCreated::decode_raw_log(log.topics.iter().copied(), &log.data, true)
        {
            return Some((event.poolId, event.pool));
        }
    }

    None
}
