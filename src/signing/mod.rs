//! Multi-coin signing engine
//!
//! Dispatch is by [`Coin`], exhaustively matched; the payload shape must
//! agree with the coin family. Derived private material lives for the
//! duration of one call and is dropped on return.

pub mod bitcoin;
pub mod ethereum;
pub mod safe;

use bip39::Mnemonic;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{KeyfobError, KeyfobResult};
use crate::types::{Coin, TransactionSignature};
use crate::wallet::{derive_leaf, CoinPath};

/// Coin-specific payload for one signing request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningPayload {
    /// Bitcoin family: base64 PSBT
    Psbt { psbt: String },
    /// Ethereum family: arbitrary message bytes (UTF-8 text on the wire)
    Message { message: String },
    /// Gnosis Safe family: externally computed 32-byte transaction hash, hex
    SafeTransactionHash { hash: String },
}

/// Sign a payload for the given coin.
///
/// `address_index` is optional for message-signing flows; callers that want
/// a leaf-indexed key must pass it explicitly.
pub fn sign(
    phrase: &Mnemonic,
    coin: Coin,
    account: u32,
    address_index: Option<u32>,
    payload: &SigningPayload,
) -> KeyfobResult<TransactionSignature> {
    match (coin, payload) {
        (c, SigningPayload::Psbt { psbt }) if c.is_bitcoin() => {
            Ok(TransactionSignature::PerInput(bitcoin::sign_psbt(phrase, psbt)?))
        }

        (Coin::Eth | Coin::TEth, SigningPayload::Message { message }) => {
            let key = leaf_secret(phrase, coin, account, address_index)?;
            let sig = ethereum::sign_message(message.as_bytes(), key.as_ref())?;
            Ok(TransactionSignature::Single(sig))
        }

        (Coin::EthContract | Coin::TEthContract, SigningPayload::SafeTransactionHash { hash }) => {
            let key = leaf_secret(phrase, coin, account, address_index)?;
            let signer = ethereum::address_from_private_key(key.as_ref())?;
            let sig = safe::sign_safe_transaction_hash(hash, key.as_ref(), &signer)?;
            Ok(TransactionSignature::Single(sig))
        }

        (coin, payload) => Err(KeyfobError::incorrect_state(format!(
            "Payload {} does not match coin {:?}",
            payload_kind(payload),
            coin
        ))),
    }
}

/// Sign a plain message for any non-contract coin family.
///
/// Bitcoin-family message signing is not part of this system's surface, so
/// message signing always routes through the Ethereum scheme.
pub fn sign_message(
    phrase: &Mnemonic,
    coin: Coin,
    account: u32,
    address_index: Option<u32>,
    message: &[u8],
) -> KeyfobResult<String> {
    if coin.is_bitcoin() {
        return Err(KeyfobError::unsupported_coin(format!(
            "Message signing is not supported for {:?}",
            coin
        )));
    }
    let key = leaf_secret(phrase, coin, account, address_index)?;
    ethereum::sign_message(message, key.as_ref())
}

/// Derive the leaf private key bytes for one signing call
fn leaf_secret(
    phrase: &Mnemonic,
    coin: Coin,
    account: u32,
    address_index: Option<u32>,
) -> KeyfobResult<Zeroizing<[u8; 32]>> {
    let path = CoinPath::for_coin(coin, account, address_index);
    let leaf = derive_leaf(phrase, &path)?;
    Ok(Zeroizing::new(leaf.private_key.secret_bytes()))
}

fn payload_kind(payload: &SigningPayload) -> &'static str {
    match payload {
        SigningPayload::Psbt { .. } => "psbt",
        SigningPayload::Message { .. } => "message",
        SigningPayload::SafeTransactionHash { .. } => "safe_transaction_hash",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn phrase() -> Mnemonic {
        Mnemonic::parse(PHRASE).unwrap()
    }

    #[test]
    fn test_eth_message_dispatch() {
        let payload = SigningPayload::Message {
            message: "hello".into(),
        };
        let sig = sign(&phrase(), Coin::Eth, 0, Some(0), &payload).unwrap();
        match sig {
            TransactionSignature::Single(hex_sig) => assert_eq!(hex_sig.len(), 130),
            other => panic!("expected single signature, got {:?}", other),
        }
    }

    #[test]
    fn test_safe_hash_dispatch() {
        let payload = SigningPayload::SafeTransactionHash {
            hash: hex::encode([0x5a; 32]),
        };
        let sig = sign(&phrase(), Coin::TEthContract, 0, Some(0), &payload).unwrap();
        assert!(matches!(sig, TransactionSignature::Single(_)));
    }

    #[test]
    fn test_mismatched_payload_rejected() {
        let payload = SigningPayload::Message {
            message: "hello".into(),
        };
        let err = sign(&phrase(), Coin::Btc, 0, None, &payload).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IncorrectState);
    }

    #[test]
    fn test_bitcoin_message_signing_unsupported() {
        let err = sign_message(&phrase(), Coin::TBtc, 0, None, b"msg").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::UnsupportedCoin);
    }

    #[test]
    fn test_message_signature_stable_across_calls() {
        let a = sign_message(&phrase(), Coin::Eth, 0, Some(0), b"determinism").unwrap();
        let b = sign_message(&phrase(), Coin::Eth, 0, Some(0), b"determinism").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_account_and_index_change_signature() {
        let base = sign_message(&phrase(), Coin::Eth, 0, Some(0), b"m").unwrap();
        let other_account = sign_message(&phrase(), Coin::Eth, 1, Some(0), b"m").unwrap();
        let no_index = sign_message(&phrase(), Coin::Eth, 0, None, b"m").unwrap();
        assert_ne!(base, other_account);
        assert_ne!(base, no_index);
    }
}
