//! Ceremony configuration
//!
//! Timeout and blob-version constants are explicit configuration handed to
//! the adapter and orchestrator, not module-level globals.

use std::time::Duration;

use crate::blob::BlobVersion;

/// Prompt timeout tolerating multi-tap authenticator interaction
pub const DEFAULT_CEREMONY_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for authenticator ceremonies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CeremonyConfig {
    /// How long the external credential API waits for the user prompt
    pub timeout: Duration,
    /// Version tag new blobs are written under
    pub blob_version: BlobVersion,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CEREMONY_TIMEOUT,
            blob_version: BlobVersion::V1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CeremonyConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.blob_version, BlobVersion::V1);
    }
}
