//! Cryptographic operations for Pagelock.
//!
//! All primitives sit behind [`CryptoProvider`] so a host can swap in its
//! platform implementation; [`NativeCrypto`] uses the RustCrypto crates:
//! - **PBKDF2-HMAC-SHA256** for key and IV stretching
//! - **AES-256-CBC** with PKCS#7 padding for content
//! - **HMAC-SHA256** for integrity
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading protected content without the password
//! - Silent tampering with the embedded ciphertext
//!
//! We do NOT defend against:
//! - Offline brute force (fixed salts, low iteration counts are part of the format)
//! - Timing differences between a padding failure and a sentinel mismatch
//! - Anyone with access to the cache store of an unlocked visitor

pub mod jwk;
pub mod key;
pub mod provider;

pub use jwk::{export_key, import_key, JsonWebKey, KeyUsage};
pub use key::{derive_key_material, DerivedKeyMaterial, SecretKey};
pub use provider::{CryptoProvider, NativeCrypto, IV_LENGTH, KEY_LENGTH, SIGNATURE_LENGTH};
