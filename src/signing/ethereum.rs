//! Ethereum personal message signing (EIP-191)
//!
//! Format: "\x19Ethereum Signed Message:\n" + len(message) + message
//!
//! Signatures are returned as raw hex (r || s || v, 65 bytes) with the
//! transport prefix stripped.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};

use crate::error::{KeyfobError, KeyfobResult};

/// Ethereum message prefix for personal_sign
const ETH_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hash a message with the Ethereum personal sign prefix
pub fn personal_sign_hash(message: &[u8]) -> [u8; 32] {
    let prefix = format!("{}{}", ETH_MESSAGE_PREFIX, message.len());
    let mut data = Vec::with_capacity(prefix.len() + message.len());
    data.extend_from_slice(prefix.as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

/// Sign a message using Ethereum personal_sign.
///
/// Returns the 65-byte signature (r, s, v with v = 27 + recovery id) as
/// raw hex without a `0x` prefix.
pub fn sign_message(message: &[u8], private_key: &[u8]) -> KeyfobResult<String> {
    let hash = personal_sign_hash(message);
    sign_hash_raw(&hash, private_key)
}

/// Sign a pre-computed 32-byte hash directly (no prefix applied)
pub fn sign_hash_raw(hash: &[u8; 32], private_key: &[u8]) -> KeyfobResult<String> {
    if private_key.len() != 32 {
        return Err(KeyfobError::signing_failed(format!(
            "Expected 32-byte private key, got {}",
            private_key.len()
        )));
    }

    let secp = Secp256k1::new();
    let secret_key = SecretKey::from_slice(private_key)?;
    let msg = Message::from_digest_slice(hash)?;

    let sig = secp.sign_ecdsa_recoverable(&msg, &secret_key);
    let (recovery_id, sig_bytes) = sig.serialize_compact();

    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&sig_bytes);
    out[64] = 27 + recovery_id.to_i32() as u8;

    Ok(hex::encode(out))
}

/// Recover the signer's checksummed address from a 65-byte signature over
/// the given (already prefixed or raw) 32-byte hash
pub fn recover_address(hash: &[u8; 32], signature: &[u8]) -> KeyfobResult<String> {
    if signature.len() != 65 {
        return Err(KeyfobError::invalid_submission(format!(
            "Expected 65-byte signature, got {}",
            signature.len()
        )));
    }

    let v = signature[64];
    let recovery_id = if v >= 27 { v - 27 } else { v };
    if recovery_id > 3 {
        return Err(KeyfobError::invalid_submission(format!(
            "Invalid recovery id: {}",
            recovery_id
        )));
    }

    let secp = Secp256k1::new();
    let msg = Message::from_digest_slice(hash)?;
    let rec_id = RecoveryId::from_i32(recovery_id as i32)?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], rec_id)?;
    let public_key = secp.recover_ecdsa(&msg, &recoverable)?;

    let pub_key_bytes = public_key.serialize_uncompressed();
    let pub_key_hash = keccak256(&pub_key_bytes[1..]);
    Ok(checksum_address(&hex::encode(&pub_key_hash[12..])))
}

/// Verify a personal_sign signature against an expected address
pub fn verify_personal_sign(
    message: &[u8],
    signature: &[u8],
    address: &str,
) -> KeyfobResult<bool> {
    let hash = personal_sign_hash(message);
    let recovered = recover_address(&hash, signature)?;
    let expected = address.trim_start_matches("0x").to_lowercase();
    let actual = recovered.trim_start_matches("0x").to_lowercase();
    Ok(expected == actual)
}

/// Derive the signer's checksummed address from a private key
pub fn address_from_private_key(private_key: &[u8]) -> KeyfobResult<String> {
    let secp = Secp256k1::new();
    let secret_key = SecretKey::from_slice(private_key)?;
    let public_key = secret_key.public_key(&secp);
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Ok(checksum_address(&hex::encode(&hash[12..])))
}

/// Create a checksummed Ethereum address (EIP-55)
pub fn checksum_address(address: &str) -> String {
    let address = address.trim_start_matches("0x").to_lowercase();
    let hash = keccak256(address.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in address.chars().enumerate() {
        if c.is_ascii_digit() {
            result.push(c);
        } else {
            let nibble = hash[i / 2];
            let should_upper = if i % 2 == 0 {
                nibble >> 4 >= 8
            } else {
                nibble & 0x0f >= 8
            };
            result.push(if should_upper { c.to_ascii_uppercase() } else { c });
        }
    }

    result
}

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}
