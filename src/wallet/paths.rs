//! Coin derivation paths
//!
//! Paths take the shape `m/purpose[']/coinType/account/0[/addressIndex]`.
//! Hardening applies to the purpose segment only, and only when the coin
//! configuration designates it; the change segment is fixed at 0 because
//! none of the supported coins use change addresses here.

use bitcoin::bip32::{ChildNumber, DerivationPath};

use crate::error::{KeyfobError, KeyfobResult};
use crate::types::Coin;

/// Change segment, fixed for every supported coin
const CHANGE: u32 = 0;

/// A coin-specific derivation path description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinPath {
    pub purpose: u32,
    pub purpose_hardened: bool,
    pub coin_type: u32,
    pub account: u32,
    /// Optional leaf segment; message-signing flows omit it and sign with
    /// the account-change node instead
    pub address_index: Option<u32>,
}

impl CoinPath {
    /// Build the path for a coin's configured key family
    pub fn for_coin(coin: Coin, account: u32, address_index: Option<u32>) -> Self {
        Self {
            purpose: coin.purpose(),
            purpose_hardened: coin.purpose_hardened(),
            coin_type: coin.coin_type(),
            account,
            address_index,
        }
    }

    /// Render as a concrete BIP-32 derivation path
    pub fn to_derivation_path(&self) -> KeyfobResult<DerivationPath> {
        let purpose = if self.purpose_hardened {
            ChildNumber::from_hardened_idx(self.purpose)
        } else {
            ChildNumber::from_normal_idx(self.purpose)
        }
        .map_err(|e| KeyfobError::invalid_path(format!("Purpose segment: {}", e)))?;

        let coin_type = ChildNumber::from_normal_idx(self.coin_type)
            .map_err(|e| KeyfobError::invalid_path(format!("Coin type segment: {}", e)))?;
        let account = ChildNumber::from_normal_idx(self.account)
            .map_err(|e| KeyfobError::invalid_path(format!("Account segment: {}", e)))?;
        let change = ChildNumber::from_normal_idx(CHANGE)
            .map_err(|e| KeyfobError::invalid_path(format!("Change segment: {}", e)))?;

        let mut segments = vec![purpose, coin_type, account, change];
        if let Some(index) = self.address_index {
            let leaf = ChildNumber::from_normal_idx(index)
                .map_err(|e| KeyfobError::invalid_path(format!("Address index segment: {}", e)))?;
            segments.push(leaf);
        }

        Ok(DerivationPath::from(segments))
    }
}
