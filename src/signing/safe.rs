//! Gnosis Safe transaction-hash signing
//!
//! The Safe collaborator computes the transaction hash off-process; this
//! module signs those raw hash bytes and fixes up the signature's `v` byte
//! to the value Safe verification expects.
//!
//! The recovery-id to `v` mapping is re-derived here instead of ported:
//! for a raw ECDSA signature over the unprefixed hash, Safe expects
//! `v = recovery_id + 27`. The adjustment is verified by recovering the
//! signer's own address from the unprefixed hash; a signature whose `v`
//! does not recover the signer is rejected outright.

use crate::error::{KeyfobError, KeyfobResult};

use super::ethereum::{recover_address, sign_hash_raw};

/// Sign a 32-byte Safe transaction hash (hex, `0x` optional).
///
/// Returns the 65-byte signature as raw hex, `v` adjusted and verified
/// against the signer's address.
pub fn sign_safe_transaction_hash(
    hash_hex: &str,
    private_key: &[u8],
    signer_address: &str,
) -> KeyfobResult<String> {
    let hash_bytes = hex::decode(hash_hex.trim_start_matches("0x"))?;
    let hash: [u8; 32] = hash_bytes.as_slice().try_into().map_err(|_| {
        KeyfobError::invalid_submission(format!(
            "Safe transaction hash must be 32 bytes, got {}",
            hash_bytes.len()
        ))
    })?;

    let sig_hex = sign_hash_raw(&hash, private_key)?;
    let signature = hex::decode(&sig_hex)?;

    adjust_v(&hash, &signature, signer_address)
}

/// Fix up the signature's `v` byte so that recovering against the
/// unprefixed hash yields the signer's own address.
///
/// Tries the two canonical values (27, 28); anything else means the
/// signature does not belong to this signer over this hash.
fn adjust_v(hash: &[u8; 32], signature: &[u8], signer_address: &str) -> KeyfobResult<String> {
    if signature.len() != 65 {
        return Err(KeyfobError::invalid_submission(format!(
            "Expected 65-byte signature, got {}",
            signature.len()
        )));
    }

    let expected = signer_address.trim_start_matches("0x").to_lowercase();

    for v in [27u8, 28u8] {
        let mut candidate = signature.to_vec();
        candidate[64] = v;
        let recovered = recover_address(hash, &candidate)?;
        if recovered.trim_start_matches("0x").to_lowercase() == expected {
            return Ok(hex::encode(candidate));
        }
    }

    Err(KeyfobError::signing_failed(
        "No recovery id recovers the signer address for this Safe hash",
    ))
}
