//! Response sanitizer
//!
//! The authentication result that leaves the process toward the server must
//! never carry extension secrets. Sanitizing splits one raw result into a
//! server-bound copy with the `largeBlob` and `prf` sub-results emptied,
//! and locally retained values for client-side use only.
//!
//! The empty marker is deliberate: sub-results stay present with emptied
//! contents, so the server can tell redaction happened from a credential
//! that produced no extension output at all.

use crate::error::{KeyfobError, KeyfobResult};
use crate::types::{AuthenticationResult, CapabilityProfile, SanitizedAssertion};

use super::{b64url_decode, b64url_encode};

/// Validate capability claims against observed outputs, then strip secrets.
///
/// A claimed capability whose output is missing is fatal to the ceremony:
/// proceeding would mean losing the blob or the PRF secret silently.
pub fn sanitize(
    result: &AuthenticationResult,
    profile: &CapabilityProfile,
) -> KeyfobResult<SanitizedAssertion> {
    let blob_b64 = result
        .extension_results
        .large_blob
        .as_ref()
        .and_then(|lb| lb.blob.as_deref())
        .filter(|b| !b.is_empty());

    let prf_b64 = result
        .extension_results
        .prf
        .as_ref()
        .and_then(|prf| prf.first.as_deref())
        .filter(|p| !p.is_empty());

    if profile.has_large_blob && blob_b64.is_none() {
        return Err(KeyfobError::failed_read(
            "Credential claims a stored blob but the assertion carried none",
        ));
    }

    if profile.prf_supported && prf_b64.is_none() {
        return Err(KeyfobError::failed_write(
            "Credential claims PRF support but the assertion carried no PRF output",
        ));
    }

    // Locally retained values: blob transport-decoded to plaintext, PRF
    // output kept base64url encoded.
    let blob_plaintext = blob_b64
        .map(|b| {
            let bytes = b64url_decode(b)?;
            String::from_utf8(bytes)
                .map_err(|_| KeyfobError::failed_read("Large blob contents are not UTF-8"))
        })
        .transpose()?;

    let prf_output = prf_b64
        .map(|p| b64url_decode(p).map(|bytes| b64url_encode(&bytes)))
        .transpose()?;

    let mut response = result.clone();
    response.extension_results = result.extension_results.redacted();

    // Post-condition, not just intent: a residual secret here is a leak.
    if !response.extension_results.is_secret_free() {
        return Err(KeyfobError::unknown(
            "Sanitized response still carries extension secrets",
        ));
    }

    Ok(SanitizedAssertion {
        response,
        blob_plaintext,
        prf_output,
    })
}
