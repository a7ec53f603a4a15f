//! Error types for Pagelock core operations.
//!
//! The first three variants are the outcomes of a failed unlock attempt.
//! They are kept distinct internally so the host can pick the right alert
//! text, while `WrongPassword` deliberately hides which check failed.

use thiserror::Error;

/// Result type alias for Pagelock operations.
pub type Result<T> = std::result::Result<T, PagelockError>;

/// Core error type for Pagelock operations.
#[derive(Debug, Error)]
pub enum PagelockError {
    /// Decryption failed or the plaintext did not start with the sentinel
    #[error("Incorrect password")]
    WrongPassword,

    /// Sentinel matched but the HMAC signature did not
    #[error("Content integrity check failed")]
    IntegrityFailure,

    /// A cached key record exists but cannot be used
    #[error("Cached key record is invalid: {0}")]
    CacheCorruption(String),

    /// Encryption primitive error (build side)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Key-value store backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input (malformed page document, bad configuration)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for PagelockError {
    fn from(err: serde_json::Error) -> Self {
        PagelockError::InvalidInput(err.to_string())
    }
}
