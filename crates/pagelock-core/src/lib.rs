//! # Pagelock Core
//!
//! Core library for Pagelock - password-gated content for static pages.
//!
//! A block of page content is encrypted and signed at build time. At view
//! time a password is stretched into key material which decrypts the block,
//! checks a known prefix, and verifies an HMAC before anything is revealed.
//! Derived (never raw) key material can be cached per page so later visits
//! skip the prompt.
//!
//! ## Architecture
//!
//! - **crypto**: primitive provider trait, key derivation, JWK export
//! - **decrypt**: AES-CBC decryption with sentinel-based wrong-password detection
//! - **integrity**: HMAC-SHA256 verification of the decrypted plaintext
//! - **cache**: per-page persistence of derived key material
//! - **storage**: key-value store trait and implementations
//! - **unlock**: the orchestrating state machine and its observers
//! - **payload**: page payload types and build-side sealing
//! - **render**: fragment processing applied on reveal

pub mod cache;
pub mod config;
pub mod crypto;
pub mod decrypt;
pub mod error;
pub mod fs;
pub mod integrity;
pub mod payload;
pub mod render;
pub mod storage;
pub mod unlock;

pub use config::ProtectionConfig;
pub use error::{PagelockError, Result};
pub use unlock::{Orchestrator, UnlockObserver, UnlockOutcome, UnlockState};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
