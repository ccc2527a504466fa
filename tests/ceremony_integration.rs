//! End-to-end ceremony flows against a mock credential API.
//!
//! The mock behaves like an authenticator with one large-blob slot: writes
//! land in shared state, reads return whatever was last written, and
//! failure modes are injectable per test.

use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use keyfob_core::ceremony::{
    AssertionRequest, AssertionResponse, CredentialApi, CredentialApiError, ExtensionOutputs,
};
use keyfob_core::types::{
    AuthenticationResult, CapabilityProfile, ExtensionResults, LargeBlobOutput,
};
use keyfob_core::{
    blob, sanitize, BlobVersion, CeremonyConfig, Coin, ErrorCode, Orchestrator, RequestOptions,
    SigningPayload, TransactionSignature,
};

const CREDENTIAL_ID: &[u8] = b"test-credential-id";
const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[derive(Clone, Default)]
struct MockAuthenticator {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    blob_slot: Option<Vec<u8>>,
    /// Report writes as uncommitted
    refuse_writes: bool,
    /// Inject a ceremony failure
    fail_with: Option<CredentialApiError>,
    /// PRF output to return when a salt is supplied
    prf_output: Option<Vec<u8>>,
}

impl MockAuthenticator {
    fn with_blob(blob: &str) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().blob_slot = Some(blob.as_bytes().to_vec());
        mock
    }

    fn failing(err: CredentialApiError) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_with = Some(err);
        mock
    }
}

impl CredentialApi for MockAuthenticator {
    async fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<AssertionResponse, CredentialApiError> {
        let mut state = self.state.lock().unwrap();

        if let Some(err) = state.fail_with.clone() {
            return Err(err);
        }

        let credential_id = request
            .allow_credentials
            .first()
            .map(|c| c.id.clone())
            .ok_or_else(|| CredentialApiError::NotAllowed("empty allow list".into()))?;

        let mut extensions = ExtensionOutputs::default();

        if let Some(bytes) = request.extensions.large_blob_write {
            if state.refuse_writes {
                extensions.large_blob_written = Some(false);
            } else {
                state.blob_slot = Some(bytes);
                extensions.large_blob_written = Some(true);
            }
        } else if request.extensions.large_blob_read {
            extensions.large_blob = state.blob_slot.clone();
        }

        if request.extensions.prf_salt.is_some() {
            extensions.prf_first = state.prf_output.clone();
        }

        Ok(AssertionResponse {
            credential_id,
            authenticator_data: vec![0x01; 37],
            client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
            signature: vec![0x30, 0x44],
            user_handle: None,
            extensions,
        })
    }
}

fn options() -> RequestOptions {
    RequestOptions {
        challenge: URL_SAFE_NO_PAD.encode(b"server-issued-challenge"),
        allow_credentials: vec![URL_SAFE_NO_PAD.encode(CREDENTIAL_ID)],
        rp_id: Some("example.org".into()),
        prf_salt: None,
    }
}

fn orchestrator(mock: MockAuthenticator) -> Orchestrator<MockAuthenticator> {
    Orchestrator::new(mock, CeremonyConfig::default())
}

#[tokio::test]
async fn create_wallet_stores_blob_and_sanitizes() {
    let mock = MockAuthenticator::default();
    let orch = orchestrator(mock.clone());

    let creation = orch
        .create_wallet(
            &options(),
            &URL_SAFE_NO_PAD.encode(CREDENTIAL_ID),
            Coin::Btc,
            &CapabilityProfile::default(),
        )
        .await
        .unwrap();

    assert_eq!(creation.blob_version, BlobVersion::V1);
    assert!(creation.extended_public_key.starts_with("xpub"));
    assert!(creation
        .sanitized
        .response
        .extension_results
        .is_secret_free());

    // The authenticator slot now holds a decodable versioned blob
    let stored = mock.state.lock().unwrap().blob_slot.clone().unwrap();
    let decoded = blob::decode(std::str::from_utf8(&stored).unwrap()).unwrap();
    assert_eq!(decoded.version, Some(BlobVersion::V1));
}

#[tokio::test]
async fn stored_seed_round_trips_through_export() {
    let phrase = bip39::Mnemonic::parse(PHRASE).unwrap();
    let encoded = blob::encode(&phrase, BlobVersion::V1).unwrap();
    let orch = orchestrator(MockAuthenticator::with_blob(&encoded));

    let exported = orch.export_seed_phrase(&options()).await.unwrap();
    assert_eq!(exported, PHRASE);
}

#[tokio::test]
async fn purpose_scoped_xpub_differs_from_master_and_is_deterministic() {
    let phrase = bip39::Mnemonic::parse(PHRASE).unwrap();
    let encoded = blob::encode(&phrase, BlobVersion::V1).unwrap();
    let orch = orchestrator(MockAuthenticator::with_blob(&encoded));

    let master = orch
        .export_extended_public_key(&options(), None)
        .await
        .unwrap();
    let scoped = orch
        .export_extended_public_key(&options(), Some(Coin::Btc))
        .await
        .unwrap();
    let scoped_again = orch
        .export_extended_public_key(&options(), Some(Coin::Btc))
        .await
        .unwrap();

    assert_ne!(master, scoped);
    assert_eq!(scoped, scoped_again);
}

#[tokio::test]
async fn sign_message_yields_raw_hex_signature() {
    let phrase = bip39::Mnemonic::parse(PHRASE).unwrap();
    let encoded = blob::encode(&phrase, BlobVersion::V1).unwrap();
    let orch = orchestrator(MockAuthenticator::with_blob(&encoded));

    let sig = orch
        .sign_message(&options(), Coin::Eth, 0, Some(0), "hello")
        .await
        .unwrap();

    assert_eq!(sig.len(), 130);
    assert!(!sig.starts_with("0x"));
    assert!(hex::decode(&sig).is_ok());
}

#[tokio::test]
async fn sign_safe_transaction_hash_end_to_end() {
    let phrase = bip39::Mnemonic::parse(PHRASE).unwrap();
    let encoded = blob::encode(&phrase, BlobVersion::V1).unwrap();
    let orch = orchestrator(MockAuthenticator::with_blob(&encoded));

    let payload = SigningPayload::SafeTransactionHash {
        hash: hex::encode([0x42; 32]),
    };
    let sig = orch
        .sign_transaction(&options(), Coin::EthContract, 0, Some(0), &payload)
        .await
        .unwrap();

    match sig {
        TransactionSignature::Single(hex_sig) => {
            let bytes = hex::decode(hex_sig).unwrap();
            assert_eq!(bytes.len(), 65);
            assert!(bytes[64] == 27 || bytes[64] == 28);
        }
        other => panic!("expected single signature, got {:?}", other),
    }
}

#[tokio::test]
async fn legacy_unversioned_blob_still_signs() {
    let orch = orchestrator(MockAuthenticator::with_blob(PHRASE));

    let sig = orch
        .sign_message(&options(), Coin::Eth, 0, Some(0), "legacy seed")
        .await
        .unwrap();
    assert_eq!(sig.len(), 130);
}

#[tokio::test]
async fn empty_blob_slot_is_failed_read() {
    let orch = orchestrator(MockAuthenticator::with_blob(""));

    let err = orch.export_seed_phrase(&options()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FailedRead);
}

#[tokio::test]
async fn missing_blob_slot_is_failed_read() {
    let orch = orchestrator(MockAuthenticator::default());

    let err = orch.export_seed_phrase(&options()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FailedRead);
}

#[tokio::test]
async fn uncommitted_write_is_failed_write() {
    let mock = MockAuthenticator::default();
    mock.state.lock().unwrap().refuse_writes = true;
    let orch = orchestrator(mock);

    let err = orch
        .create_wallet(
            &options(),
            &URL_SAFE_NO_PAD.encode(CREDENTIAL_ID),
            Coin::Btc,
            &CapabilityProfile::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::FailedWrite);
}

#[tokio::test]
async fn dismissed_prompt_surfaces_as_user_exited() {
    let orch = orchestrator(MockAuthenticator::failing(CredentialApiError::UserCancelled));

    let err = orch
        .sign_message(&options(), Coin::Eth, 0, Some(0), "hello")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UserExited);
}

#[tokio::test]
async fn transport_failure_surfaces_as_unable_to_connect() {
    let orch = orchestrator(MockAuthenticator::failing(CredentialApiError::Transport(
        "usb removed".into(),
    )));

    let err = orch.export_seed_phrase(&options()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UnableToConnect);
}

#[tokio::test]
async fn read_without_candidates_is_incorrect_state() {
    let orch = orchestrator(MockAuthenticator::default());
    let mut opts = options();
    opts.allow_credentials.clear();

    let err = orch.export_seed_phrase(&opts).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::IncorrectState);
}

#[test]
fn synthetic_assertion_sanitizes_to_plaintext_blob() {
    // Build the wire shape a read ceremony produces for a stored V1 blob
    let phrase = bip39::Mnemonic::parse(PHRASE).unwrap();
    let encoded = blob::encode(&phrase, BlobVersion::V1).unwrap();

    let result = AuthenticationResult {
        credential_id: URL_SAFE_NO_PAD.encode(CREDENTIAL_ID),
        authenticator_data: URL_SAFE_NO_PAD.encode([0x01; 37]),
        client_data_json: URL_SAFE_NO_PAD.encode(br#"{"type":"webauthn.get"}"#),
        signature: URL_SAFE_NO_PAD.encode([0x30, 0x44]),
        user_handle: None,
        extension_results: ExtensionResults {
            large_blob: Some(LargeBlobOutput {
                blob: Some(URL_SAFE_NO_PAD.encode(encoded.as_bytes())),
                written: None,
            }),
            prf: None,
        },
    };
    let profile = CapabilityProfile {
        has_large_blob: true,
        ..Default::default()
    };

    let sanitized = sanitize(&result, &profile).unwrap();

    // Locally retained plaintext decodes back to the original mnemonic
    let plaintext = sanitized.blob_plaintext.unwrap();
    assert_eq!(plaintext, encoded);
    let decoded = blob::decode(&plaintext).unwrap();
    assert_eq!(decoded.phrase.to_string(), PHRASE);

    // Server-bound copy carries no blob bytes
    let server_copy = serde_json::to_string(&sanitized.response).unwrap();
    assert!(!server_copy.contains(&URL_SAFE_NO_PAD.encode(encoded.as_bytes())));
    assert!(sanitized.response.extension_results.is_secret_free());
}
