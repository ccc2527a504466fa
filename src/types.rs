//! Shared types for ceremonies, extensions, and signing
//!
//! Everything that crosses the wire toward the server is serde-derived and
//! carries binary fields as base64url text. Raw authenticator buffers stay
//! as `Vec<u8>` and only exist between the credential API and the adapter.

use serde::{Deserialize, Serialize};

use crate::error::KeyfobError;

/// Supported coins for derivation and signing.
///
/// Unknown tags are a parse-time error, never a runtime fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Coin {
    Btc,
    TBtc,
    Eth,
    TEth,
    EthContract,
    TEthContract,
}

impl Coin {
    /// SLIP-44 registered coin type (testnets use 1)
    pub fn coin_type(&self) -> u32 {
        match self {
            Coin::Btc => 0,
            Coin::TBtc => 1,
            Coin::Eth | Coin::EthContract => 60,
            Coin::TEth | Coin::TEthContract => 1,
        }
    }

    /// Default purpose segment for this coin's key family
    pub fn purpose(&self) -> u32 {
        match self {
            Coin::Btc | Coin::TBtc => 84,
            Coin::Eth | Coin::TEth | Coin::EthContract | Coin::TEthContract => 44,
        }
    }

    /// Whether the purpose segment is derived hardened.
    ///
    /// The contract-wallet families intentionally use unhardened purpose
    /// derivation so the subtree stays reproducible from the purpose xpub.
    pub fn purpose_hardened(&self) -> bool {
        !self.is_contract()
    }

    /// Contract-wallet (Gnosis Safe) coin families
    pub fn is_contract(&self) -> bool {
        matches!(self, Coin::EthContract | Coin::TEthContract)
    }

    /// Bitcoin family (PSBT signing path)
    pub fn is_bitcoin(&self) -> bool {
        matches!(self, Coin::Btc | Coin::TBtc)
    }
}

impl std::str::FromStr for Coin {
    type Err = KeyfobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BTC" => Ok(Coin::Btc),
            "TBTC" => Ok(Coin::TBtc),
            "ETH" => Ok(Coin::Eth),
            "TETH" => Ok(Coin::TEth),
            "ETH_CONTRACT" => Ok(Coin::EthContract),
            "TETH_CONTRACT" => Ok(Coin::TEthContract),
            other => Err(KeyfobError::unsupported_coin(format!(
                "Unknown coin tag: {}",
                other
            ))),
        }
    }
}

/// Challenge options issued by the server for one assertion ceremony
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Base64url challenge bytes
    pub challenge: String,
    /// Candidate credential ids (either base64 encoding accepted)
    #[serde(default)]
    pub allow_credentials: Vec<String>,
    /// Relying party identifier
    #[serde(default)]
    pub rp_id: Option<String>,
    /// Base64url PRF salt to evaluate alongside the ceremony
    #[serde(default)]
    pub prf_salt: Option<String>,
}

/// What the authenticator claims to support, as recorded at registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityProfile {
    #[serde(default)]
    pub large_blob_supported: bool,
    #[serde(default)]
    pub has_large_blob: bool,
    #[serde(default)]
    pub prf_supported: bool,
    /// Base64url PRF salt, when the credential was registered with one
    #[serde(default)]
    pub prf_salt: Option<String>,
}

/// Large-blob extension sub-result on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeBlobOutput {
    /// Base64url blob contents after a read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
    /// Whether a write was committed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<bool>,
}

/// PRF extension sub-result on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrfOutput {
    /// Base64url PRF output for the first salt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
}

/// Extension results attached to an authentication result.
///
/// Sub-results are optional; a sanitized copy keeps them *present* with
/// emptied contents so the server can tell redaction happened from absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_blob: Option<LargeBlobOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prf: Option<PrfOutput>,
}

impl ExtensionResults {
    /// The explicit redaction marker: sub-result present, contents empty
    pub fn redacted(&self) -> Self {
        Self {
            large_blob: self.large_blob.as_ref().map(|_| LargeBlobOutput {
                blob: Some(String::new()),
                written: None,
            }),
            prf: self.prf.as_ref().map(|_| PrfOutput {
                first: Some(String::new()),
            }),
        }
    }

    /// True when no secret bytes remain in either sub-result
    pub fn is_secret_free(&self) -> bool {
        let blob_clear = match &self.large_blob {
            Some(lb) => lb.blob.as_deref().unwrap_or("").is_empty(),
            None => true,
        };
        let prf_clear = match &self.prf {
            Some(prf) => prf.first.as_deref().unwrap_or("").is_empty(),
            None => true,
        };
        blob_clear && prf_clear
    }
}

/// One completed assertion ceremony, repackaged for wire transport.
///
/// All binary buffers from the authenticator are base64url encoded; the
/// credential id is additionally normalized so it matches server records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationResult {
    pub credential_id: String,
    pub authenticator_data: String,
    pub client_data_json: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
    #[serde(default)]
    pub extension_results: ExtensionResults,
}

/// Output of sanitizing an [`AuthenticationResult`].
///
/// `response` is the only field permitted to leave the process toward the
/// server. The retained secrets exist for client-side use only.
#[derive(Debug, Clone)]
pub struct SanitizedAssertion {
    /// Server-bound copy with extension secrets replaced by empty markers
    pub response: AuthenticationResult,
    /// Large-blob contents, transport-decoded to plaintext
    pub blob_plaintext: Option<String>,
    /// PRF output, base64url encoded
    pub prf_output: Option<String>,
}

/// Result of creating and storing a new wallet seed
#[derive(Debug, Clone)]
pub struct WalletCreation {
    /// Purpose-scoped extended public key (never the root's own)
    pub extended_public_key: String,
    /// Sanitized ceremony result plus locally retained extension values
    pub sanitized: SanitizedAssertion,
    /// Version tag the blob was written under
    pub blob_version: crate::blob::BlobVersion,
}

/// A produced transaction signature, shaped per coin family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionSignature {
    /// Ethereum-family: one hex signature
    Single(String),
    /// Bitcoin-family: one hex signature per signed PSBT input
    PerInput(Vec<String>),
}
