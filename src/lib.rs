//! Keyfob Core Library
//!
//! Stores a wallet seed inside a hardware authenticator's per-credential
//! large-blob slot and signs with keys derived from it, without the seed
//! ever crossing the network boundary.
//!
//! # Architecture
//!
//! - **blob**: versioned transport codec for the seed phrase
//! - **ceremony**: adapter over the external credential API, credential-id
//!   normalization, and the response sanitizer that strips extension
//!   secrets before anything reaches the server
//! - **wallet**: hierarchical key derivation (BIP-32/BIP-39)
//! - **signing**: multi-coin signing (Bitcoin PSBT, Ethereum personal
//!   messages, Gnosis Safe transaction hashes)
//! - **orchestrator**: thin sequencing of the above per use case
//!
//! # Security
//!
//! Seed material exists only transiently in process memory during a
//! ceremony; entropy and derived seeds are zeroized via `zeroize`. The
//! sanitizer's secret-exclusion post-condition is checked at runtime, not
//! merely intended.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyfob_core::{CeremonyConfig, Coin, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(platform_api, CeremonyConfig::default());
//! let creation = orchestrator
//!     .create_wallet(&options, &credential_id, Coin::Btc, &profile)
//!     .await?;
//! println!("xpub: {}", creation.extended_public_key);
//! ```

pub mod blob;
pub mod ceremony;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod signing;
pub mod types;
pub mod wallet;

// Re-export key types for convenience
pub use blob::{BlobVersion, DecodedSeed};
pub use ceremony::{
    normalize_credential_id, sanitize, AssertionRequest, AssertionResponse, CeremonyAdapter,
    CredentialApi, CredentialApiError,
};
pub use config::CeremonyConfig;
pub use error::{ErrorCode, KeyfobError, KeyfobResult};
pub use orchestrator::Orchestrator;
pub use signing::SigningPayload;
pub use types::{
    AuthenticationResult, CapabilityProfile, Coin, ExtensionResults, RequestOptions,
    SanitizedAssertion, TransactionSignature, WalletCreation,
};

/// Debug logging macro that only prints in debug builds.
///
/// Never pass secret material to this; log lengths and kinds only.
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { eprintln!($($arg)*) }
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
