use alloy_primitives::{Address, Bytes};
use poolsafe_store::{
    PageRequest, TransactionFilter, TransactionKind, TransactionStatus,
};
use serde::Deserialize;

/// Body of `POST /api/v1/transactions/{tx_hash}/signatures`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddSignaturePayload {
    pub signer: Address,
    pub signature: Bytes,
}

/// Query string of `GET /api/v1/transactions`. Kept flat because the
/// urlencoded deserializer does not cope with flattened nested structs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    pub safe_address: Option<Address>,
    pub chain_id: Option<u64>,
    pub status: Option<TransactionStatus>,
    pub kind: Option<TransactionKind>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListQuery {
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            safe_address: self.safe_address,
            chain_id: self.chain_id,
            status: self.status,
            kind: self.kind,
        }
    }

    pub fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        }
    }
}
