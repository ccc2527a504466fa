//! Unified error types for Keyfob Core
//!
//! All errors flow through this module so callers can branch on a
//! machine-checkable code instead of string matching. Error context never
//! carries secret material (seed words, derived keys, blob payloads).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all Keyfob operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyfobError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl KeyfobError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn invalid_submission(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidSubmission, msg)
    }

    pub fn incorrect_state(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncorrectState, msg)
    }

    pub fn failed_read(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedRead, msg)
    }

    pub fn failed_write(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedWrite, msg)
    }

    pub fn invalid_secret(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidSecret, msg)
    }

    pub fn unsupported_version(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedVersion, msg)
    }

    pub fn unsupported_coin(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedCoin, msg)
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPath, msg)
    }

    pub fn signing_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailed, msg)
    }

    pub fn user_exited(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserExited, msg)
    }

    pub fn unable_to_connect(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnableToConnect, msg)
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, msg)
    }
}

impl fmt::Display for KeyfobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for KeyfobError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Environment / device errors
    InvalidBrowserEnvironment,
    InvalidDevice,
    UnableToConnect,

    // Input errors
    InvalidSubmission,
    InvalidSecret,
    InvalidPath,

    // State errors
    IncorrectState,
    AlreadyRegistered,
    Duplicate,

    // Ceremony errors
    FailedRead,
    FailedWrite,
    UserExited,
    Unauthorized,
    NotAllowed,

    // Codec / engine errors
    UnsupportedVersion,
    UnsupportedCoin,
    SigningFailed,

    // Internal
    Unknown,
}

/// Result type alias for Keyfob operations
pub type KeyfobResult<T> = Result<T, KeyfobError>;

// Conversions from common error types

impl From<serde_json::Error> for KeyfobError {
    fn from(e: serde_json::Error) -> Self {
        KeyfobError::new(ErrorCode::InvalidSubmission, e.to_string())
    }
}

impl From<hex::FromHexError> for KeyfobError {
    fn from(e: hex::FromHexError) -> Self {
        KeyfobError::new(ErrorCode::InvalidSubmission, e.to_string())
    }
}

impl From<base64::DecodeError> for KeyfobError {
    fn from(e: base64::DecodeError) -> Self {
        KeyfobError::new(ErrorCode::InvalidSubmission, format!("Base64 error: {}", e))
    }
}

impl From<bip39::Error> for KeyfobError {
    fn from(e: bip39::Error) -> Self {
        KeyfobError::new(ErrorCode::InvalidSecret, format!("BIP39 error: {}", e))
    }
}

impl From<bitcoin::bip32::Error> for KeyfobError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        KeyfobError::new(ErrorCode::InvalidPath, format!("BIP32 error: {}", e))
    }
}

impl From<bitcoin::secp256k1::Error> for KeyfobError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        KeyfobError::new(ErrorCode::SigningFailed, format!("Secp256k1 error: {}", e))
    }
}
