use alloy_primitives::B256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use std::collections::HashMap;

use crate::{
    error::StoreError,
    query::{PageRequest, TransactionFilter, TransactionPage},
    record::{ExecutionInfo, SignatureEntry, TransactionRecord},
    InsertOutcome, TransactionStore,
};

/// In-memory [`TransactionStore`]. Every mutating operation runs its full
/// check-mutate-write sequence under one write lock, which gives the
/// append and status-flip operations the atomicity the trait contract
/// requires.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<B256, TransactionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert(&self, record: TransactionRecord) -> Result<InsertOutcome, StoreError> {
        let mut records = self.records.write();

        if let Some(existing) = records.get(&record.transaction_hash) {
            if existing.is_live() {
                debug!(tx_hash = %record.transaction_hash, "proposal already pending, returning existing record");
                return Ok(InsertOutcome::Existing(existing.clone()));
            }
        }

        records.insert(record.transaction_hash, record.clone());
        Ok(InsertOutcome::Created(record))
    }

    async fn get(&self, tx_hash: &B256) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.records.read().get(tx_hash).cloned())
    }

    async fn append_signature(
        &self,
        tx_hash: &B256,
        entry: SignatureEntry,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(tx_hash).ok_or(StoreError::NotFound(*tx_hash))?;

        record.apply_signature(entry, now)?;
        Ok(record.clone())
    }

    async fn mark_expired(
        &self,
        tx_hash: &B256,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(tx_hash).ok_or(StoreError::NotFound(*tx_hash))?;

        record.apply_expiry(now)?;
        Ok(record.clone())
    }

    async fn complete_execution(
        &self,
        tx_hash: &B256,
        info: ExecutionInfo,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(tx_hash).ok_or(StoreError::NotFound(*tx_hash))?;

        record.apply_execution(info, now)?;
        Ok(record.clone())
    }

    async fn fail_execution(
        &self,
        tx_hash: &B256,
        reason: String,
        partial: Option<ExecutionInfo>,
        now: DateTime<Utc>,
    ) -> Result<TransactionRecord, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(tx_hash).ok_or(StoreError::NotFound(*tx_hash))?;

        record.apply_execution_failure(reason, partial, now)?;
        Ok(record.clone())
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<TransactionPage, StoreError> {
        let records = self.records.read();

        let mut matching: Vec<TransactionRecord> =
            records.values().filter(|r| filter.matches(r)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let offset = page.offset();
        let limit = page.limit();

        let records: Vec<TransactionRecord> =
            matching.into_iter().skip(offset).take(limit).collect();

        Ok(TransactionPage {
            has_next: offset + records.len() < total,
            has_previous: offset > 0 && total > 0,
            records,
            total,
        })
    }
}
