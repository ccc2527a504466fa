//! Ceremony adapter
//!
//! Orchestrates a single authenticator ceremony (write-blob or read-blob)
//! against the external credential API and repackages the raw result for
//! wire transport. Both operations are single-shot: the ceremony already
//! serializes user interaction, so an automatic retry would double-prompt.

use crate::config::CeremonyConfig;
use crate::error::{KeyfobError, KeyfobResult};
use crate::types::{
    AuthenticationResult, ExtensionResults, LargeBlobOutput, PrfOutput, RequestOptions,
};

use super::credential::{decode_credential_id, normalize_credential_id};
use super::{
    b64url_decode, b64url_encode, AllowCredential, AssertionRequest, AssertionResponse,
    CredentialApi, ExtensionInputs, ExtensionOutputs,
};

const PUBLIC_KEY_CREDENTIAL: &str = "public-key";

/// Adapter over the external credential API for blob ceremonies
#[derive(Debug, Clone)]
pub struct CeremonyAdapter<A> {
    api: A,
    config: CeremonyConfig,
}

impl<A: CredentialApi> CeremonyAdapter<A> {
    pub fn new(api: A, config: CeremonyConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    /// Write a blob into one credential's large-blob slot.
    ///
    /// The request is scoped to exactly the given credential. Fails with
    /// `FailedWrite` when the authenticator does not report the write as
    /// committed.
    pub async fn write_blob(
        &self,
        options: &RequestOptions,
        credential_id: &str,
        blob: &str,
    ) -> KeyfobResult<AuthenticationResult> {
        let canonical_id = normalize_credential_id(credential_id)?;
        let raw_id = decode_credential_id(&canonical_id)?;

        let request = AssertionRequest {
            challenge: b64url_decode(&options.challenge)?,
            allow_credentials: vec![AllowCredential {
                id: raw_id,
                credential_type: PUBLIC_KEY_CREDENTIAL.to_string(),
            }],
            extensions: ExtensionInputs {
                large_blob_write: Some(blob.as_bytes().to_vec()),
                large_blob_read: false,
                prf_salt: decode_optional_salt(options)?,
            },
            timeout: self.config.timeout,
            rp_id: options.rp_id.clone(),
        };

        crate::debug_log!(
            "write_blob ceremony: credential={} blob_len={}",
            canonical_id,
            blob.len()
        );

        let response = self.api.get_assertion(request).await?;

        if response.extensions.large_blob_written != Some(true) {
            return Err(KeyfobError::failed_write(
                "Authenticator did not commit the large blob write",
            ));
        }

        Ok(repackage(response))
    }

    /// Read the blob from the first candidate credential that has one.
    ///
    /// An authenticator claiming to have read an *empty* blob is treated
    /// identically to "not found": an empty blob can never encode a seed.
    pub async fn read_blob(&self, options: &RequestOptions) -> KeyfobResult<String> {
        if options.allow_credentials.is_empty() {
            return Err(KeyfobError::incorrect_state(
                "No candidate credentials for blob read",
            ));
        }

        let mut allow = Vec::with_capacity(options.allow_credentials.len());
        for id in &options.allow_credentials {
            allow.push(AllowCredential {
                id: decode_credential_id(id)?,
                credential_type: PUBLIC_KEY_CREDENTIAL.to_string(),
            });
        }

        let request = AssertionRequest {
            challenge: b64url_decode(&options.challenge)?,
            allow_credentials: allow,
            extensions: ExtensionInputs {
                large_blob_write: None,
                large_blob_read: true,
                prf_salt: decode_optional_salt(options)?,
            },
            timeout: self.config.timeout,
            rp_id: options.rp_id.clone(),
        };

        crate::debug_log!(
            "read_blob ceremony: {} candidate credential(s)",
            options.allow_credentials.len()
        );

        let response = self.api.get_assertion(request).await?;

        let bytes = match response.extensions.large_blob {
            Some(ref bytes) if !bytes.is_empty() => bytes,
            _ => {
                return Err(KeyfobError::failed_read(
                    "Assertion carried no large blob contents",
                ))
            }
        };

        String::from_utf8(bytes.clone())
            .map_err(|_| KeyfobError::failed_read("Large blob contents are not UTF-8"))
    }
}

fn decode_optional_salt(options: &RequestOptions) -> KeyfobResult<Option<Vec<u8>>> {
    options
        .prf_salt
        .as_deref()
        .map(b64url_decode)
        .transpose()
}

/// Repackage a raw ceremony result into the transport encoding the server
/// expects: every binary buffer becomes base64url text.
fn repackage(response: AssertionResponse) -> AuthenticationResult {
    let AssertionResponse {
        credential_id,
        authenticator_data,
        client_data_json,
        signature,
        user_handle,
        extensions,
    } = response;

    AuthenticationResult {
        credential_id: b64url_encode(&credential_id),
        authenticator_data: b64url_encode(&authenticator_data),
        client_data_json: b64url_encode(&client_data_json),
        signature: b64url_encode(&signature),
        user_handle: user_handle.as_deref().map(b64url_encode),
        extension_results: repackage_extensions(extensions),
    }
}

fn repackage_extensions(extensions: ExtensionOutputs) -> ExtensionResults {
    let large_blob = if extensions.large_blob.is_some() || extensions.large_blob_written.is_some() {
        Some(LargeBlobOutput {
            blob: extensions.large_blob.as_deref().map(b64url_encode),
            written: extensions.large_blob_written,
        })
    } else {
        None
    };

    let prf = extensions.prf_first.as_deref().map(|first| PrfOutput {
        first: Some(b64url_encode(first)),
    });

    ExtensionResults { large_blob, prf }
}
