//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, page document).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong password, or too many attempts.
    pub const AUTH_FAILED: i32 = 5;

    /// Decrypted content did not match its signature.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Prompts per `unlock` run when a TTY is available.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Environment variable consulted before prompting.
pub const PASSWORD_ENV: &str = "PAGELOCK_PASSWORD";
