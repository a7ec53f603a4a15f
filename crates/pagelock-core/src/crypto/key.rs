//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! A password and two fixed salts fully determine the decryption key, the
//! integrity key, and the IV. There is no randomness and no error path: a
//! wrong password simply yields wrong material, which the decryptor and the
//! integrity verifier reject later.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::provider::{CryptoProvider, IV_LENGTH, KEY_LENGTH};
use crate::config::ProtectionConfig;

/// 256-bit symmetric key, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_LENGTH],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. The only sanctioned persistent
    /// form is the JWK export written by the key cache.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Everything needed to decrypt and verify one page.
#[derive(Clone)]
pub struct DerivedKeyMaterial {
    decryption_key: SecretKey,
    integrity_key: SecretKey,
    iv: [u8; IV_LENGTH],
}

impl DerivedKeyMaterial {
    pub fn new(decryption_key: SecretKey, integrity_key: SecretKey, iv: [u8; IV_LENGTH]) -> Self {
        Self {
            decryption_key,
            integrity_key,
            iv,
        }
    }

    pub fn decryption_key(&self) -> &SecretKey {
        &self.decryption_key
    }

    pub fn integrity_key(&self) -> &SecretKey {
        &self.integrity_key
    }

    pub fn iv(&self) -> &[u8; IV_LENGTH] {
        &self.iv
    }
}

impl std::fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeyMaterial")
            .field("decryption_key", &self.decryption_key)
            .field("integrity_key", &self.integrity_key)
            .field("iv", &hex::encode(self.iv))
            .finish()
    }
}

/// Derive page key material from a password.
///
/// The decryption and integrity keys share salt and iteration count, so
/// they come out byte-identical. Sealed pages depend on that, so both are
/// taken from a single PBKDF2 run.
///
/// # Examples
///
/// ```
/// use pagelock_core::crypto::{derive_key_material, NativeCrypto};
/// use pagelock_core::ProtectionConfig;
///
/// let config = ProtectionConfig::default();
/// let first = derive_key_material(&NativeCrypto, "hunter2", &config);
/// let second = derive_key_material(&NativeCrypto, "hunter2", &config);
/// assert_eq!(first.iv(), second.iv());
/// ```
pub fn derive_key_material<C>(
    crypto: &C,
    password: &str,
    config: &ProtectionConfig,
) -> DerivedKeyMaterial
where
    C: CryptoProvider + ?Sized,
{
    let mut key = [0u8; KEY_LENGTH];
    crypto.pbkdf2_sha256(
        password.as_bytes(),
        config.key_salt.as_bytes(),
        config.key_iterations,
        &mut key,
    );

    let mut iv = [0u8; IV_LENGTH];
    crypto.pbkdf2_sha256(
        password.as_bytes(),
        config.iv_salt.as_bytes(),
        config.iv_iterations,
        &mut iv,
    );

    let decryption_key = SecretKey::from_bytes(key);
    let integrity_key = decryption_key.clone();
    key.zeroize();

    DerivedKeyMaterial::new(decryption_key, integrity_key, iv)
}
