//! Key derivation
//!
//! Derives extended keys from a BIP-39 seed phrase.
//!
//! SECURITY: Seeds are wrapped in `Zeroizing` and private key material is
//! returned transiently for immediate signing, never stored or logged.

use bip39::Mnemonic;
use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Network;
use zeroize::Zeroizing;

use crate::error::{KeyfobError, KeyfobResult};

use super::paths::CoinPath;

/// Build the master extended private key from a seed phrase
fn master_xpriv(phrase: &Mnemonic) -> KeyfobResult<Xpriv> {
    // Network only affects the serialization prefix, not derivation
    let seed = Zeroizing::new(phrase.to_seed(""));
    Ok(Xpriv::new_master(Network::Bitcoin, seed.as_ref())?)
}

/// Root export: the master node's public extended key.
///
/// No path, no private exposure.
pub fn master_xpub(phrase: &Mnemonic) -> KeyfobResult<Xpub> {
    let secp = Secp256k1::new();
    let master = master_xpriv(phrase)?;
    Ok(Xpub::from_priv(&secp, &master))
}

/// Purpose-scoped export: the extended public key of `m/purpose[']`.
///
/// A single root secret backs logically distinct key families this way,
/// without ever exposing the root's own public key.
pub fn purpose_xpub(phrase: &Mnemonic, purpose: u32, hardened: bool) -> KeyfobResult<Xpub> {
    let secp = Secp256k1::new();
    let master = master_xpriv(phrase)?;

    let segment = if hardened {
        ChildNumber::from_hardened_idx(purpose)
    } else {
        ChildNumber::from_normal_idx(purpose)
    }
    .map_err(|e| KeyfobError::invalid_path(format!("Purpose segment: {}", e)))?;

    let node = master.derive_priv(&secp, &[segment])?;
    Ok(Xpub::from_priv(&secp, &node))
}

/// Full-path derivation for signing: the leaf node's private key.
///
/// Transient by contract; the caller signs with it and lets it drop.
pub fn derive_leaf(phrase: &Mnemonic, path: &CoinPath) -> KeyfobResult<Xpriv> {
    let secp = Secp256k1::new();
    let master = master_xpriv(phrase)?;
    let derivation = path.to_derivation_path()?;
    Ok(master.derive_priv(&secp, &derivation)?)
}

/// The master extended private key, for signers that resolve their own
/// paths from transaction structure (PSBT `bip32_derivation` maps)
pub fn hierarchical_root(phrase: &Mnemonic) -> KeyfobResult<Xpriv> {
    master_xpriv(phrase)
}
