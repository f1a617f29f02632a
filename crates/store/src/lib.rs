//! Durable record of proposed multisig transactions and their signature
//! state.
//!
//! The [`TransactionStore`] trait is the document-store seam of the
//! coordinator: records are keyed by their Safe transaction hash, signature
//! appends are atomic (no read-modify-write replace), and every status
//! transition is written together with its full payload. [`MemoryStore`]
//! implements the trait behind a single lock and backs tests and local
//! deployments.

mod error;
mod memory;
mod query;
mod record;

pub use error::{StateError, StoreError};
pub use memory::MemoryStore;
pub use query::{PageRequest, TransactionFilter, TransactionPage};
pub use record::{
    ExecutionInfo, SignatureEntry, TransactionKind, TransactionRecord, TransactionStatus,
};

use alloy_primitives::B256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result of an idempotent insert.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Created(TransactionRecord),
    /// A live record with the same transaction hash already existed; the
    /// proposal is idempotent and the existing record is returned.
    Existing(TransactionRecord),
}

impl InsertOutcome {
    pub fn into_record(self) -> TransactionRecord {
        match self {
            InsertOutcome::Created(record) | InsertOutcome::Existing(record) => record,
        }
    }
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a freshly proposed record. If a record with the same hash
    /// exists and is not failed/expired the existing record wins; a
    /// failed or expired predecessor is replaced.
    async fn insert(&self, record: TransactionRecord) -> Result<InsertOutcome, StoreError>;

    async fn get(&self, tx_hash: &B256) -> Result<Option<TransactionRecord>, StoreError>;

    /// Appends a signature and flips the record to `ready_to_execute` when
    /// the threshold is met, in one atomic write. Duplicate signers and
    /// wrong statuses are rejected with typed errors; a pending record past
    /// its deadline is expired as a side effect of the rejection.
    async fn append_signature(
        &self,
        tx_hash: &B256,
        entry: SignatureEntry,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError>;

    /// Lazily expires a pending record past its deadline.
    async fn mark_expired(
        &self,
        tx_hash: &B256,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError>;

    /// Records a confirmed execution. Only legal while `ready_to_execute`.
    async fn complete_execution(
        &self,
        tx_hash: &B256,
        info: ExecutionInfo,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError>;

    /// Records a failed execution attempt, with whatever partial block/gas
    /// data was observed. Only legal while `ready_to_execute`.
    async fn fail_execution(
        &self,
        tx_hash: &B256,
        reason: String,
        partial: Option<ExecutionInfo>,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError>;

    /// Filtered listing ordered by creation time descending.
    async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<TransactionPage, StoreError>;
}
