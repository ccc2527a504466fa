//! Credential-id normalization
//!
//! Client integrations hand us credential ids in either standard base64 or
//! base64url, padded or not. Server records and allow-lists only match if
//! every id goes through one canonical form first: base64url, no padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{KeyfobError, KeyfobResult};

/// Decode a credential id in either supported text encoding
pub fn decode_credential_id(id: &str) -> KeyfobResult<Vec<u8>> {
    let unified: String = id
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD.decode(unified.as_bytes()).map_err(|e| {
        KeyfobError::invalid_submission(format!("Credential id is not base64: {}", e))
    })
}

/// Canonicalize a credential id to base64url without padding.
///
/// Idempotent: normalizing a canonical id returns it unchanged.
pub fn normalize_credential_id(id: &str) -> KeyfobResult<String> {
    let bytes = decode_credential_id(id)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
