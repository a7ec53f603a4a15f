//! JSON Web Key export/import for cached key material.
//!
//! Cache records store keys in the same `oct` JWK shape a browser's
//! `exportKey('jwk', ...)` produces, so records written by either side stay
//! readable.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::key::SecretKey;
use super::provider::KEY_LENGTH;
use crate::error::{PagelockError, Result};

/// What an exported key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Decrypt,
    Verify,
}

impl KeyUsage {
    fn algorithm(self) -> &'static str {
        match self {
            KeyUsage::Decrypt => "A256CBC",
            KeyUsage::Verify => "HS256",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Verify => "verify",
        }
    }
}

/// Symmetric JWK (RFC 7517, `kty: "oct"`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct JsonWebKey {
    pub kty: String,
    pub k: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default)]
    pub ext: bool,
    #[serde(default)]
    pub key_ops: Vec<String>,
}

impl std::fmt::Debug for JsonWebKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonWebKey")
            .field("kty", &self.kty)
            .field("k", &"[REDACTED]")
            .field("alg", &self.alg)
            .field("ext", &self.ext)
            .field("key_ops", &self.key_ops)
            .finish()
    }
}

pub fn export_key(key: &SecretKey, usage: KeyUsage) -> JsonWebKey {
    JsonWebKey {
        kty: "oct".to_string(),
        k: URL_SAFE_NO_PAD.encode(key.as_bytes()),
        alg: Some(usage.algorithm().to_string()),
        ext: true,
        key_ops: vec![usage.operation().to_string()],
    }
}

/// Rebuild a key from its JWK form.
///
/// `alg` is optional, but when present it must match the usage. Any
/// mismatch is reported as `CacheCorruption`.
pub fn import_key(jwk: &JsonWebKey, usage: KeyUsage) -> Result<SecretKey> {
    if jwk.kty != "oct" {
        return Err(PagelockError::CacheCorruption(format!(
            "unsupported key type \"{}\"",
            jwk.kty
        )));
    }
    if let Some(alg) = jwk.alg.as_deref() {
        if alg != usage.algorithm() {
            return Err(PagelockError::CacheCorruption(format!(
                "expected algorithm {}, found {}",
                usage.algorithm(),
                alg
            )));
        }
    }

    let decoded = Zeroizing::new(
        URL_SAFE_NO_PAD
            .decode(jwk.k.trim_end_matches('=').as_bytes())
            .map_err(|e| PagelockError::CacheCorruption(format!("key is not base64url: {}", e)))?,
    );
    if decoded.len() != KEY_LENGTH {
        return Err(PagelockError::CacheCorruption(format!(
            "key must be {} bytes, found {}",
            KEY_LENGTH,
            decoded.len()
        )));
    }

    let mut bytes = [0u8; KEY_LENGTH];
    bytes.copy_from_slice(&decoded);
    let key = SecretKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}
