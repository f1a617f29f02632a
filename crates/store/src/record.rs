use alloy_primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Duration, Utc};
use poolsafe_primitives::consts::TRANSACTION_TTL_SECS;
use safe_multisig::transaction_data::SafeTransactionData;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::error::StateError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    PendingSignatures,
    ReadyToExecute,
    Executed,
    Failed,
    Expired,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    PoolCreation,
    AdminAction,
    Batch,
    Generic,
}

/// One collected owner signature. Signer uniqueness is enforced on append;
/// `Address` equality is canonical, so the comparison is case-insensitive
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub signer: Address,
    pub data: Bytes,
    pub signed_at: DateTime<Utc>,
}

/// Result data of a confirmed (or partially observed) execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub execution_tx_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub gas_used: Option<u128>,
    /// Set for `pool_creation` transactions when the factory event parsed.
    pub pool_id: Option<U256>,
    pub pool_address: Option<Address>,
}

/// The persisted record of one proposed multisig transaction, keyed by its
/// Safe transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_hash: B256,
    pub safe_address: Address,
    pub chain_id: u64,
    pub kind: TransactionKind,
    pub description: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub status: TransactionStatus,
    pub tx: SafeTransactionData,
    pub signatures: Vec<SignatureEntry>,
    pub required_signatures: u32,
    pub current_signatures: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub execution: Option<ExecutionInfo>,
    pub failure_reason: Option<String>,
}

impl TransactionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transaction_hash: B256,
        safe_address: Address,
        chain_id: u64,
        kind: TransactionKind,
        description: String,
        metadata: BTreeMap<String, String>,
        tx: SafeTransactionData,
        required_signatures: u32,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_hash,
            safe_address,
            chain_id,
            kind,
            description,
            metadata,
            status: TransactionStatus::PendingSignatures,
            tx,
            signatures: Vec::new(),
            required_signatures,
            current_signatures: 0,
            created_by,
            created_at: now,
            expires_at: now + Duration::seconds(TRANSACTION_TTL_SECS),
            ready_at: None,
            executed_at: None,
            failed_at: None,
            execution: None,
            failure_reason: None,
        }
    }

    /// A record is live while it can still make progress. Failed and
    /// expired records may be superseded by a new proposal with the same
    /// hash.
    pub fn is_live(&self) -> bool {
        !matches!(self.status, TransactionStatus::Failed | TransactionStatus::Expired)
    }

    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, TransactionStatus::PendingSignatures) && now > self.expires_at
    }

    /// Appends a signature, flipping to `ready_to_execute` when the
    /// threshold is met. Returns whether the record became ready. A pending
    /// record past its deadline is moved to `expired` here, as a side
    /// effect of the rejected append.
    pub fn apply_signature(
        &mut self,
        entry: SignatureEntry,
        now: DateTime<Utc>,
    ) -> Result<bool, StateError> {
        if self.is_past_deadline(now) {
            self.status = TransactionStatus::Expired;
            return Err(StateError::Expired);
        }
        if self.status != TransactionStatus::PendingSignatures {
            return Err(StateError::NotPending(self.status));
        }
        if self.signatures.iter().any(|s| s.signer == entry.signer) {
            return Err(StateError::AlreadySigned(entry.signer));
        }

        self.signatures.push(entry);
        self.current_signatures = self.signatures.len() as u32;

        if self.current_signatures >= self.required_signatures {
            self.status = TransactionStatus::ReadyToExecute;
            self.ready_at = Some(now);
            return Ok(true);
        }

        Ok(false)
    }

    pub fn apply_expiry(&mut self, now: DateTime<Utc>) -> Result<(), StateError> {
        if !self.is_past_deadline(now) {
            return Err(StateError::NotPending(self.status));
        }
        self.status = TransactionStatus::Expired;
        Ok(())
    }

    pub fn apply_execution(
        &mut self,
        info: ExecutionInfo,
        now: DateTime<Utc>,
    ) -> Result<(), StateError> {
        match self.status {
            TransactionStatus::ReadyToExecute => {
                self.status = TransactionStatus::Executed;
                self.executed_at = Some(now);
                self.execution = Some(info);
                Ok(())
            }
            TransactionStatus::Executed => Err(StateError::AlreadyExecuted),
            status => Err(StateError::NotReady(status)),
        }
    }

    /// A failed execution is terminal; the record never returns to
    /// `pending_signatures` and a retry requires a new proposal.
    pub fn apply_execution_failure(
        &mut self,
        reason: String,
        partial: Option<ExecutionInfo>,
        now: DateTime<Utc>,
    ) -> Result<(), StateError> {
        match self.status {
            TransactionStatus::ReadyToExecute => {
                self.status = TransactionStatus::Failed;
                self.failed_at = Some(now);
                self.failure_reason = Some(reason);
                self.execution = partial;
                Ok(())
            }
            TransactionStatus::Executed => Err(StateError::AlreadyExecuted),
            status => Err(StateError::NotReady(status)),
        }
    }
}
