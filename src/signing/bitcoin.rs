//! Bitcoin-family PSBT signing
//!
//! The PSBT's own `bip32_derivation` maps say which paths apply per input,
//! so signing takes the hierarchical root and lets the PSBT select keys.

use bip39::Mnemonic;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Psbt;
use std::str::FromStr;

use crate::error::{KeyfobError, KeyfobResult};
use crate::wallet::derivation::hierarchical_root;

/// Sign every PSBT input the hierarchical root can, returning the extracted
/// per-input signatures as hex (DER + sighash-type byte).
pub fn sign_psbt(phrase: &Mnemonic, psbt_base64: &str) -> KeyfobResult<Vec<String>> {
    let mut psbt = Psbt::from_str(psbt_base64)
        .map_err(|e| KeyfobError::invalid_submission(format!("PSBT parse error: {}", e)))?;

    let root = hierarchical_root(phrase)?;
    let secp = Secp256k1::new();

    let signed_inputs = match psbt.sign(&root, &secp) {
        Ok(keys) => keys.len(),
        // Partial success still yields usable signatures; total failure
        // below surfaces as an empty extraction.
        Err((keys, errors)) => {
            crate::debug_log!(
                "psbt signing: {} input(s) signed, {} error(s)",
                keys.len(),
                errors.len()
            );
            keys.len()
        }
    };

    let signatures: Vec<String> = psbt
        .inputs
        .iter()
        .flat_map(|input| {
            input
                .partial_sigs
                .values()
                .map(|sig| hex::encode(sig.serialize().to_vec()))
        })
        .collect();

    if signatures.is_empty() {
        return Err(KeyfobError::signing_failed(format!(
            "No PSBT inputs could be signed ({} matched a derivation)",
            signed_inputs
        )));
    }

    Ok(signatures)
}
