use alloy_primitives::{Address, Bytes};
use chrono::Utc;
use poolsafe_store::{SignatureEntry, StateError, TransactionStatus};
use safe_multisig::{calls, verify};
use serde::Serialize;
use tracing::{info, warn};

use crate::{error::CoordinatorError, service::parse_tx_hash, MultisigService};

/// Outcome of a signature submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub current_signatures: u32,
    pub required_signatures: u32,
    pub ready_to_execute: bool,
}

impl MultisigService {
    /// Accepts one owner signature for a pending transaction.
    ///
    /// The duplicate and status checks run twice: once on the loaded
    /// record for cheap rejection before any chain I/O, and again inside
    /// the store's atomic append, which is the write that counts under
    /// concurrent submissions.
    pub async fn add_signature(
        &self,
        tx_hash: &str,
        signer: Address,
        signature: Bytes,
    ) -> Result<SignatureStatus, CoordinatorError> {
        let hash = parse_tx_hash(tx_hash)?;
        let now = Utc::now();

        let record = self
            .store
            .get(&hash)
            .await
            .map_err(CoordinatorError::from)?
            .ok_or(CoordinatorError::NotFound(hash))?;

        if record.is_past_deadline(now) {
            self.store.mark_expired(&hash, now).await?;
            return Err(StateError::Expired.into());
        }
        if record.status != TransactionStatus::PendingSignatures {
            return Err(StateError::NotPending(record.status).into());
        }
        if record.signatures.iter().any(|s| s.signer == signer) {
            return Err(StateError::AlreadySigned(signer).into());
        }

        if !calls::is_owner(signer, record.safe_address, &*self.provider).await? {
            return Err(CoordinatorError::NotAnOwner { signer, safe: record.safe_address });
        }

        let verification =
            verify::verify(record.safe_address, signer, hash, &signature, &*self.provider).await;
        for warning in &verification.warnings {
            warn!(tx_hash = %hash, %signer, "{warning}");
        }
        if !verification.valid {
            let reason = verification
                .warnings
                .last()
                .cloned()
                .unwrap_or_else(|| "signature rejected".to_string());
            return Err(CoordinatorError::InvalidSignature { reason });
        }

        let entry = SignatureEntry { signer, data: signature, signed_at: now };
        let updated = self.store.append_signature(&hash, entry, now).await?;

        let ready = updated.status == TransactionStatus::ReadyToExecute;
        if ready {
            info!(
                tx_hash = %hash,
                signatures = updated.current_signatures,
                "quorum met, transaction ready to execute"
            );
        }

        Ok(SignatureStatus {
            current_signatures: updated.current_signatures,
            required_signatures: updated.required_signatures,
            ready_to_execute: ready,
        })
    }
}
