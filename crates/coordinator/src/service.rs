use alloy_primitives::B256;
use chrono::Utc;
use lazy_static::lazy_static;
use poolsafe_store::{
    PageRequest, TransactionFilter, TransactionPage, TransactionRecord, TransactionStore,
};
use regex::Regex;
use safe_multisig::{calls, provider::EvmProvider};
use tracing::info;

use std::{str::FromStr, sync::Arc};

use crate::{
    error::CoordinatorError,
    proposal::{build_transaction, ProposeRequest},
};

lazy_static! {
    static ref TX_HASH_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap();
}

/// Validates and parses a caller-supplied transaction hash before any
/// store or chain I/O happens.
pub(crate) fn parse_tx_hash(raw: &str) -> Result<B256, CoordinatorError> {
    if !TX_HASH_RE.is_match(raw) {
        return Err(CoordinatorError::InvalidHash(raw.to_string()));
    }

    B256::from_str(raw).map_err(|_| CoordinatorError::InvalidHash(raw.to_string()))
}

/// The coordinator facade. Holds the injected store and provider; one
/// instance serves all requests and keeps no other state.
pub struct MultisigService {
    pub(crate) store: Arc<dyn TransactionStore>,
    pub(crate) provider: Arc<dyn EvmProvider>,
}

impl MultisigService {
    pub fn new(store: Arc<dyn TransactionStore>, provider: Arc<dyn EvmProvider>) -> Self {
        Self { store, provider }
    }

    /// Proposes a transaction: builds the descriptor, captures the wallet
    /// threshold, computes the wallet-defined transaction hash and stores
    /// the record. Proposing an identical still-live transaction returns
    /// the existing record instead of erroring or duplicating.
    pub async fn propose_transaction(
        &self,
        request: ProposeRequest,
    ) -> Result<TransactionRecord, CoordinatorError> {
        let threshold = calls::get_threshold(request.safe_address, &*self.provider).await?;
        let required_signatures = u32::try_from(threshold)
            .map_err(|_| CoordinatorError::WalletMisconfigured("threshold out of range".into()))?;
        if required_signatures == 0 {
            return Err(CoordinatorError::WalletMisconfigured(
                "wallet reports a threshold of 0".into(),
            ));
        }

        let tx = build_transaction(
            &request.call,
            request.safe_address,
            request.chain_id,
            &*self.provider,
        )
        .await?;

        let transaction_hash =
            calls::get_transaction_hash(&tx, request.safe_address, &*self.provider).await?;

        let record = TransactionRecord::new(
            transaction_hash,
            request.safe_address,
            request.chain_id,
            request.kind,
            request.description,
            request.metadata,
            tx,
            required_signatures,
            request.created_by,
            Utc::now(),
        );

        let outcome = self.store.insert(record).await?;
        if let poolsafe_store::InsertOutcome::Created(record) = &outcome {
            info!(
                tx_hash = %record.transaction_hash,
                safe = %record.safe_address,
                kind = %record.kind,
                required_signatures = record.required_signatures,
                "proposed multisig transaction"
            );
        }

        Ok(outcome.into_record())
    }

    /// Returns the current record for a hash, applying the lazy expiry
    /// check: a pending record read past its deadline is moved to
    /// `expired` and the expired record is returned.
    pub async fn get_transaction_status(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionRecord>, CoordinatorError> {
        let hash = parse_tx_hash(tx_hash)?;

        let Some(record) = self.store.get(&hash).await.map_err(CoordinatorError::from)? else {
            return Ok(None);
        };

        if record.is_past_deadline(Utc::now()) {
            let expired = self.store.mark_expired(&hash, Utc::now()).await?;
            return Ok(Some(expired));
        }

        Ok(Some(record))
    }

    /// Paginated listing, newest first. Read-only.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<TransactionPage, CoordinatorError> {
        self.store.list(filter, page).await.map_err(CoordinatorError::from)
    }
}
