use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::record::{TransactionKind, TransactionRecord, TransactionStatus};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Equality filters for the listing endpoint. Absent fields match
/// everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub safe_address: Option<Address>,
    pub chain_id: Option<u64>,
    pub status: Option<TransactionStatus>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.safe_address.is_none_or(|safe| record.safe_address == safe)
            && self.chain_id.is_none_or(|chain_id| record.chain_id == chain_id)
            && self.status.is_none_or(|status| record.status == status)
            && self.kind.is_none_or(|kind| record.kind == kind)
    }
}

/// One-based page selector.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: default_page(), page_size: default_page_size() }
    }
}

impl PageRequest {
    /// Offset of the first record on this page, with page size clamped to
    /// [1, MAX_PAGE_SIZE].
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit()
    }

    pub fn limit(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub records: Vec<TransactionRecord>,
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}
