//! Hierarchical key derivation
//!
//! Turns a decoded seed phrase plus a coin path description into signing
//! keys or extended public keys. Derived private material is transient:
//! callers use it immediately and let it drop.

pub mod derivation;
pub mod paths;

pub use derivation::{derive_leaf, master_xpub, purpose_xpub};
pub use paths::CoinPath;
