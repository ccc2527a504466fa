//! Versioned seed-blob codec
//!
//! The seed phrase travels to and from the authenticator's large blob as
//! `<base64(utf8(words))>.<versionTag>`. Base64 here is transport encoding,
//! not encryption; the blob slot itself is the protected storage.
//!
//! Versioning exists so the generation or encoding scheme can change later:
//! known old formats stay readable, unknown future formats fail loudly
//! instead of producing garbage key material.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bip39::Mnemonic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KeyfobError, KeyfobResult};

/// Delimiter between payload and version tag
const VERSION_DELIMITER: char = '.';

/// Blob format versions. Exactly one is defined today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobVersion {
    V1,
}

impl fmt::Display for BlobVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobVersion::V1 => write!(f, "V1"),
        }
    }
}

impl FromStr for BlobVersion {
    type Err = KeyfobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "V1" => Ok(BlobVersion::V1),
            other => Err(KeyfobError::unsupported_version(format!(
                "Unknown blob version tag: {}",
                other
            ))),
        }
    }
}

/// A decoded seed blob: the phrase plus the version it was stored under.
///
/// `version == None` marks the legacy pre-versioning path: the blob was a
/// bare mnemonic with no tag. That path exists only to migrate old blobs
/// and callers should rewrite such blobs at the next opportunity.
#[derive(Debug, Clone)]
pub struct DecodedSeed {
    pub phrase: Mnemonic,
    pub version: Option<BlobVersion>,
}

impl DecodedSeed {
    /// Compatibility-warning signal for pre-versioning blobs
    pub fn legacy(&self) -> bool {
        self.version.is_none()
    }
}

/// Encode a seed phrase into a versioned transport blob
pub fn encode(phrase: &Mnemonic, version: BlobVersion) -> KeyfobResult<String> {
    match version {
        BlobVersion::V1 => {
            let payload = STANDARD.encode(phrase.to_string().as_bytes());
            Ok(format!("{}{}{}", payload, VERSION_DELIMITER, version))
        }
    }
}

/// Encode raw mnemonic words, validating wordlist and checksum first.
///
/// Fails with `InvalidSecret` when the words are not a valid mnemonic.
pub fn encode_words(words: &str, version: BlobVersion) -> KeyfobResult<String> {
    let phrase = Mnemonic::parse(words)?;
    encode(&phrase, version)
}

/// Decode a transport blob back into a seed phrase.
///
/// All-or-nothing: any malformed payload or unknown version tag fails the
/// whole decode, never a partial phrase.
pub fn decode(blob: &str) -> KeyfobResult<DecodedSeed> {
    // Legacy path: pre-versioning blobs were the bare mnemonic words
    if let Ok(phrase) = Mnemonic::parse(blob) {
        crate::debug_log!("decoded legacy unversioned seed blob");
        return Ok(DecodedSeed {
            phrase,
            version: None,
        });
    }

    let (payload, tag) = blob
        .rsplit_once(VERSION_DELIMITER)
        .ok_or_else(|| KeyfobError::invalid_secret("Blob is neither versioned nor a bare mnemonic"))?;

    let version = BlobVersion::from_str(tag)?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| KeyfobError::invalid_secret(format!("Blob payload is not base64: {}", e)))?;
    let words = String::from_utf8(bytes)
        .map_err(|_| KeyfobError::invalid_secret("Blob payload is not UTF-8"))?;
    let phrase = Mnemonic::parse(&words)
        .map_err(|e| KeyfobError::invalid_secret(format!("Blob payload is not a valid mnemonic: {}", e)))?;

    Ok(DecodedSeed {
        phrase,
        version: Some(version),
    })
}

/// Validate a mnemonic phrase against the BIP-39 wordlist and checksum
pub fn validate_mnemonic(words: &str) -> bool {
    Mnemonic::parse(words).is_ok()
}
