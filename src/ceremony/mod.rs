//! Authenticator ceremony layer
//!
//! The external credential API (platform WebAuthn / CTAP stack) is a black
//! box behind the [`CredentialApi`] trait: one suspending call per ceremony,
//! resolved when the user completes or dismisses the prompt. Everything it
//! returns is raw binary; the adapter owns repackaging for the wire.
//!
//! Callers must keep at most one ceremony in flight per credential: the
//! authenticator serializes user interaction and a concurrent second
//! ceremony would race the prompt state.

pub mod adapter;
pub mod credential;
pub mod sanitizer;

pub use adapter::CeremonyAdapter;
pub use credential::normalize_credential_id;
pub use sanitizer::sanitize;

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{ErrorCode, KeyfobError, KeyfobResult};

/// Encode raw authenticator bytes for wire transport
pub(crate) fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url wire text, tolerating trailing padding
pub(crate) fn b64url_decode(text: &str) -> KeyfobResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(text.trim_end_matches('=').as_bytes())
        .map_err(|e| KeyfobError::invalid_submission(format!("Base64url error: {}", e)))
}

/// One allowed credential in an assertion request
#[derive(Debug, Clone)]
pub struct AllowCredential {
    /// Raw credential id bytes
    pub id: Vec<u8>,
    /// Credential type; always "public-key" today
    pub credential_type: String,
}

/// Extension directives for one assertion ceremony
#[derive(Debug, Clone, Default)]
pub struct ExtensionInputs {
    /// Write these bytes into the credential's large blob
    pub large_blob_write: Option<Vec<u8>>,
    /// Read the credential's large blob
    pub large_blob_read: bool,
    /// Evaluate the PRF extension with this salt
    pub prf_salt: Option<Vec<u8>>,
}

/// A "get assertion" request handed to the external credential API
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    pub challenge: Vec<u8>,
    pub allow_credentials: Vec<AllowCredential>,
    pub extensions: ExtensionInputs,
    pub timeout: Duration,
    pub rp_id: Option<String>,
}

/// Raw extension outputs from the authenticator
#[derive(Debug, Clone, Default)]
pub struct ExtensionOutputs {
    /// Large blob contents after a read
    pub large_blob: Option<Vec<u8>>,
    /// Whether a large blob write was committed
    pub large_blob_written: Option<bool>,
    /// PRF output for the supplied salt
    pub prf_first: Option<Vec<u8>>,
}

/// Raw result of one completed assertion ceremony
#[derive(Debug, Clone)]
pub struct AssertionResponse {
    pub credential_id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
    pub extensions: ExtensionOutputs,
}

/// Failures surfaced by the external credential API
#[derive(Debug, Clone, thiserror::Error)]
pub enum CredentialApiError {
    #[error("user dismissed the prompt")]
    UserCancelled,
    #[error("operation not allowed: {0}")]
    NotAllowed(String),
    #[error("no eligible authenticator: {0}")]
    NoDevice(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("credential API failure: {0}")]
    Other(String),
}

impl From<CredentialApiError> for KeyfobError {
    fn from(e: CredentialApiError) -> Self {
        match e {
            CredentialApiError::UserCancelled => {
                KeyfobError::user_exited("User dismissed the authenticator prompt")
            }
            CredentialApiError::NotAllowed(msg) => {
                KeyfobError::new(ErrorCode::NotAllowed, msg)
            }
            CredentialApiError::NoDevice(msg) => {
                KeyfobError::new(ErrorCode::InvalidDevice, msg)
            }
            CredentialApiError::Transport(msg) => KeyfobError::unable_to_connect(msg),
            CredentialApiError::Other(msg) => KeyfobError::unknown(msg),
        }
    }
}

/// External credential API: one ceremony per call, no partial results.
///
/// The single `await` point covers the whole human-in-the-loop interaction;
/// there is nothing to poll and no programmatic cancel.
pub trait CredentialApi {
    fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> impl std::future::Future<Output = Result<AssertionResponse, CredentialApiError>> + Send;
}
