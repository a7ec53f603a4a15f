//! Primitive crypto operations.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PagelockError, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// AES-256 and HMAC key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES block / IV length in bytes.
pub const IV_LENGTH: usize = 16;

/// HMAC-SHA256 output length in bytes.
pub const SIGNATURE_LENGTH: usize = 32;

/// The primitives the unlock pipeline needs.
///
/// Implementations must be deterministic: the same inputs always give the
/// same outputs. Key derivation has no error path.
pub trait CryptoProvider {
    /// Fill `out` with PBKDF2-HMAC-SHA256 output.
    fn pbkdf2_sha256(&self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]);

    /// AES-256-CBC decrypt and strip PKCS#7 padding.
    fn aes_cbc_decrypt(
        &self,
        key: &[u8; KEY_LENGTH],
        iv: &[u8; IV_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;

    /// AES-256-CBC encrypt with PKCS#7 padding.
    fn aes_cbc_encrypt(
        &self,
        key: &[u8; KEY_LENGTH],
        iv: &[u8; IV_LENGTH],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// HMAC-SHA256 of `message`.
    fn hmac_sign(&self, key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH]>;

    /// Constant-time HMAC-SHA256 check.
    fn hmac_verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

/// RustCrypto-backed provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCrypto;

impl CryptoProvider for NativeCrypto {
    fn pbkdf2_sha256(&self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, out);
    }

    fn aes_cbc_decrypt(
        &self,
        key: &[u8; KEY_LENGTH],
        iv: &[u8; IV_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        let decryptor = Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|e| PagelockError::Crypto(format!("Failed to create decryptor: {}", e)))?;
        decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| PagelockError::Crypto("Invalid padding or block length".to_string()))
    }

    fn aes_cbc_encrypt(
        &self,
        key: &[u8; KEY_LENGTH],
        iv: &[u8; IV_LENGTH],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let encryptor = Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|e| PagelockError::Crypto(format!("Failed to create encryptor: {}", e)))?;
        Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn hmac_sign(&self, key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH]> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| PagelockError::Crypto(format!("Invalid HMAC key: {}", e)))?;
        mac.update(message);
        let mut signature = [0u8; SIGNATURE_LENGTH];
        signature.copy_from_slice(&mac.finalize().into_bytes());
        Ok(signature)
    }

    fn hmac_verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(key) else {
            return false;
        };
        mac.update(message);
        mac.verify_slice(signature).is_ok()
    }
}
