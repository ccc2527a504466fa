//! Use-case orchestration
//!
//! Thin sequencing over the ceremony adapter, blob codec, derivation and
//! signing engines. Holds no state across calls; each function is
//! independently callable and idempotent at the protocol level.
//!
//! Precondition for every function here: at most one in-flight ceremony
//! per credential per session. The authenticator serializes user
//! interaction, and a concurrent second ceremony would race the prompt.
//!
//! Key material is scoped to one call chain: the seed phrase is decoded
//! from a freshly read blob, used, and dropped before the call returns.

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::blob;
use crate::ceremony::{sanitize, CeremonyAdapter, CredentialApi};
use crate::config::CeremonyConfig;
use crate::error::{KeyfobError, KeyfobResult};
use crate::signing::{self, SigningPayload};
use crate::types::{
    CapabilityProfile, Coin, RequestOptions, TransactionSignature, WalletCreation,
};
use crate::wallet::{master_xpub, purpose_xpub};

/// Sequences ceremonies, codec, derivation and signing for each use case
#[derive(Debug, Clone)]
pub struct Orchestrator<A> {
    adapter: CeremonyAdapter<A>,
}

impl<A: CredentialApi> Orchestrator<A> {
    pub fn new(api: A, config: CeremonyConfig) -> Self {
        Self {
            adapter: CeremonyAdapter::new(api, config),
        }
    }

    /// Generate a fresh seed, store it in the credential's large blob, and
    /// return the purpose-scoped extended public key plus the sanitized
    /// ceremony result to forward to the server.
    ///
    /// Re-running this against a credential that already holds a blob
    /// overwrites the prior seed; callers must gate that on user intent.
    pub async fn create_wallet(
        &self,
        options: &RequestOptions,
        credential_id: &str,
        coin: Coin,
        profile: &CapabilityProfile,
    ) -> KeyfobResult<WalletCreation> {
        let phrase = generate_phrase()?;
        let version = self.adapter.config().blob_version;
        let encoded = blob::encode(&phrase, version)?;

        let result = self
            .adapter
            .write_blob(options, credential_id, &encoded)
            .await?;

        let extended_public_key =
            purpose_xpub(&phrase, coin.purpose(), coin.purpose_hardened())?.to_string();

        let sanitized = sanitize(&result, profile)?;

        Ok(WalletCreation {
            extended_public_key,
            sanitized,
            blob_version: version,
        })
    }

    /// Read the stored seed and export an extended public key: the master
    /// node's for `coin: None`, else the coin's purpose-scoped subtree.
    pub async fn export_extended_public_key(
        &self,
        options: &RequestOptions,
        coin: Option<Coin>,
    ) -> KeyfobResult<String> {
        let phrase = self.read_phrase(options).await?;
        let xpub = match coin {
            None => master_xpub(&phrase)?,
            Some(c) => purpose_xpub(&phrase, c.purpose(), c.purpose_hardened())?,
        };
        Ok(xpub.to_string())
    }

    /// Read the stored seed and sign an arbitrary message, returning the
    /// signature as raw hex.
    pub async fn sign_message(
        &self,
        options: &RequestOptions,
        coin: Coin,
        account: u32,
        address_index: Option<u32>,
        message: &str,
    ) -> KeyfobResult<String> {
        let phrase = self.read_phrase(options).await?;
        signing::sign_message(&phrase, coin, account, address_index, message.as_bytes())
    }

    /// Read the stored seed and sign a coin transaction payload.
    pub async fn sign_transaction(
        &self,
        options: &RequestOptions,
        coin: Coin,
        account: u32,
        address_index: Option<u32>,
        payload: &SigningPayload,
    ) -> KeyfobResult<TransactionSignature> {
        let phrase = self.read_phrase(options).await?;
        signing::sign(&phrase, coin, account, address_index, payload)
    }

    /// Read the stored seed and hand back the raw mnemonic words, for
    /// user-facing export only.
    pub async fn export_seed_phrase(&self, options: &RequestOptions) -> KeyfobResult<String> {
        let phrase = self.read_phrase(options).await?;
        Ok(phrase.to_string())
    }

    async fn read_phrase(&self, options: &RequestOptions) -> KeyfobResult<Mnemonic> {
        let encoded = self.adapter.read_blob(options).await?;
        let decoded = blob::decode(&encoded)?;
        if decoded.legacy() {
            crate::debug_log!("stored blob predates versioning; consider rewriting it");
        }
        Ok(decoded.phrase)
    }
}

/// Generate a fresh 12-word seed phrase from OS entropy.
///
/// SECURITY: Entropy is zeroized after mnemonic construction.
fn generate_phrase() -> KeyfobResult<Mnemonic> {
    let mut entropy = Zeroizing::new([0u8; 16]); // 128 bits = 12 words
    OsRng.fill_bytes(entropy.as_mut());

    Mnemonic::from_entropy(entropy.as_ref())
        .map_err(|e| KeyfobError::invalid_secret(format!("Failed to create mnemonic: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_phrase_is_twelve_valid_words() {
        let phrase = generate_phrase().unwrap();
        assert_eq!(phrase.word_count(), 12);
        assert!(blob::validate_mnemonic(&phrase.to_string()));
    }

    #[test]
    fn test_generated_phrases_differ() {
        let a = generate_phrase().unwrap();
        let b = generate_phrase().unwrap();
        assert_ne!(a.to_string(), b.to_string());
    }
}
