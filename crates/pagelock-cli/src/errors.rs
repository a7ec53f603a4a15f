//! CLI error types for structured error handling.
//!
//! Each variant maps to an exit code in [`crate::constants::exit_codes`].
//! Command handlers return them through `anyhow`; `main` downcasts and exits.

use std::fmt;

use pagelock_core::unlock::Rejection;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, page document)
    NotFound { message: String, hint: String },

    /// Wrong password, or attempts exhausted
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Decrypted content failed the HMAC check
    IntegrityFailed(String),

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and no hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn integrity_failed(message: impl Into<String>) -> Self {
        CliError::IntegrityFailed(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Terminal error for a rejected unlock attempt.
    pub fn from_rejection(rejection: Rejection) -> Self {
        match rejection {
            Rejection::IntegrityFailure => CliError::integrity_failed(
                "The decrypted content does not match its signature.",
            ),
            Rejection::WrongPassword | Rejection::CacheCorruption => {
                CliError::auth_failed("Incorrect password.")
            }
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;

    #[test]
    fn test_rejections_map_to_exit_codes() {
        assert_eq!(
            CliError::from_rejection(Rejection::WrongPassword).exit_code(),
            exit_codes::AUTH_FAILED
        );
        assert_eq!(
            CliError::from_rejection(Rejection::IntegrityFailure).exit_code(),
            exit_codes::INTEGRITY_FAILED
        );
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::not_found("No page at x", "Hint: check the path");
        assert_eq!(err.to_string(), "No page at x\nHint: check the path");
    }
}
