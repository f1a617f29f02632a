use alloy_primitives::{Address, FixedBytes, PrimitiveSignature, B256, U256};
use poolsafe_primitives::consts::is_supported_safe_version;
use serde::Serialize;
use tracing::debug;

use crate::{calls, provider::EvmProvider};

/// Return value a contract signer yields for a valid signature (EIP-1271).
pub const EIP1271_MAGIC_VALUE: FixedBytes<4> = FixedBytes([0x16, 0x26, 0xba, 0x7e]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Direct,
    Eip1271,
    Fallback,
}

/// Outcome of a signature verification. Warnings never change the verdict.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub valid: bool,
    pub method: VerificationMethod,
    pub warnings: Vec<String>,
}

impl Verification {
    fn ok(method: VerificationMethod, warnings: Vec<String>) -> Self {
        Self { valid: true, method, warnings }
    }

    fn fail(method: VerificationMethod, mut warnings: Vec<String>, reason: String) -> Self {
        warnings.push(reason);
        Self { valid: false, method, warnings }
    }
}

/// Verifies that `signature` over `message_hash` was produced by
/// `claimed_signer`, an owner of the Safe at `safe`.
///
/// The wallet's version, threshold and owner set are read first; if any of
/// those reads fail the result is invalid. Ambiguity is never treated as
/// success, in particular a contract signer returning the EIP-1271 magic
/// value is not trusted unless the wallet configuration could be fetched.
pub async fn verify(
    safe: Address,
    claimed_signer: Address,
    message_hash: B256,
    signature: &[u8],
    provider: &dyn EvmProvider,
) -> Verification {
    let mut warnings = Vec::new();

    let version = match calls::get_version(safe, provider).await {
        Ok(version) => version,
        Err(e) => {
            return Verification::fail(
                VerificationMethod::Fallback,
                warnings,
                format!("could not read wallet version: {e}"),
            );
        }
    };
    if !is_supported_safe_version(&version) {
        return Verification::fail(
            VerificationMethod::Fallback,
            warnings,
            format!("unsupported wallet version {version}"),
        );
    }

    let threshold = match calls::get_threshold(safe, provider).await {
        Ok(threshold) => threshold,
        Err(e) => {
            return Verification::fail(
                VerificationMethod::Fallback,
                warnings,
                format!("could not read wallet threshold: {e}"),
            );
        }
    };
    if threshold.is_zero() {
        return Verification::fail(
            VerificationMethod::Fallback,
            warnings,
            "wallet reports a threshold of 0".to_string(),
        );
    }
    if threshold == U256::from(1) {
        warnings.push(
            "threshold of 1: consider a higher threshold for better security".to_string(),
        );
    }

    let owners = match calls::get_owners(safe, provider).await {
        Ok(owners) => owners,
        Err(e) => {
            return Verification::fail(
                VerificationMethod::Fallback,
                warnings,
                format!("could not read wallet owners: {e}"),
            );
        }
    };
    if owners.is_empty() {
        return Verification::fail(
            VerificationMethod::Fallback,
            warnings,
            "wallet reports an empty owner set".to_string(),
        );
    }
    if !owners.contains(&claimed_signer) {
        return Verification::fail(
            VerificationMethod::Fallback,
            warnings,
            format!("{claimed_signer} is not an owner of {safe}"),
        );
    }

    // EOA path: recover the signer from the prehash and compare.
    if let Ok(parsed) = PrimitiveSignature::try_from(signature) {
        if let Ok(recovered) = parsed.recover_address_from_prehash(&message_hash) {
            if recovered == claimed_signer {
                return Verification::ok(VerificationMethod::Direct, warnings);
            }
            debug!(%recovered, %claimed_signer, "ecdsa recovery mismatch, trying eip-1271");
        }
    }

    // Contract signer path: only meaningful if the claimed signer has code.
    let code = match provider.get_code(claimed_signer).await {
        Ok(code) => code,
        Err(e) => {
            return Verification::fail(
                VerificationMethod::Fallback,
                warnings,
                format!("could not read signer code: {e}"),
            );
        }
    };
    if code.is_empty() {
        return Verification::fail(
            VerificationMethod::Direct,
            warnings,
            "signature does not recover to the claimed signer".to_string(),
        );
    }

    match calls::is_valid_signature(claimed_signer, message_hash, signature, provider).await {
        Ok(magic) if magic == EIP1271_MAGIC_VALUE => {
            Verification::ok(VerificationMethod::Eip1271, warnings)
        }
        Ok(_) => Verification::fail(
            VerificationMethod::Eip1271,
            warnings,
            "contract signer rejected the signature".to_string(),
        ),
        Err(e) => Verification::fail(
            VerificationMethod::Fallback,
            warnings,
            format!("eip-1271 validation call failed: {e}"),
        ),
    }
}
