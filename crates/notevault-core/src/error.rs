//! Error types for notevault-core

use thiserror::Error;

/// Result type alias for vault crypto operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Crypto error types
///
/// Callers only ever see the kind of failure. In particular
/// [`CryptoError::AuthenticationFailed`] is returned both for tampered data
/// and for a wrong passphrase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Null, empty, or wrong-length input. Detected before any crypto work.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The integrity tag did not match.
    #[error("Authentication failed - wrong password or corrupted data")]
    AuthenticationFailed,

    /// The underlying primitives failed on otherwise valid input.
    #[error("Internal crypto error: {0}")]
    InternalCryptoError(String),
}

impl CryptoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        Self::InternalCryptoError(msg.into())
    }
}
