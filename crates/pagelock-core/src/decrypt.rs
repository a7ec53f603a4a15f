//! Content decryption with sentinel-based password checking.
//!
//! AES-CBC has no reliable wrong-key signal: a wrong key often still yields
//! valid padding. The build step therefore prepends a fixed sentinel to
//! every plaintext, and a decryption only counts when the sentinel is there.
//! Bad hex, bad length, bad padding and a missing sentinel all collapse into
//! `WrongPassword`; the cause goes to the debug log only.

use tracing::debug;
use zeroize::Zeroizing;

use crate::config::SENTINEL;
use crate::crypto::{CryptoProvider, DerivedKeyMaterial};
use crate::error::{PagelockError, Result};

/// Plaintext that passed the sentinel check.
///
/// Holds the raw decrypted bytes (what the HMAC covers) and the decoded
/// text. Integrity is NOT established yet.
pub struct DecryptedContent {
    bytes: Zeroizing<Vec<u8>>,
    text: String,
}

impl DecryptedContent {
    /// Decrypted bytes, sentinel included, exactly as the cipher produced them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The fragment after the sentinel.
    pub fn body(&self) -> &str {
        &self.text[SENTINEL.len()..]
    }

    pub fn into_body(mut self) -> String {
        self.text.split_off(SENTINEL.len())
    }
}

impl std::fmt::Debug for DecryptedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedContent")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Decrypt hex ciphertext and check the sentinel.
pub fn decrypt_content<C>(
    crypto: &C,
    ciphertext_hex: &str,
    material: &DerivedKeyMaterial,
) -> Result<DecryptedContent>
where
    C: CryptoProvider + ?Sized,
{
    let ciphertext = hex::decode(ciphertext_hex.trim()).map_err(|e| {
        debug!(error = %e, "ciphertext is not valid hex");
        PagelockError::WrongPassword
    })?;

    let bytes = Zeroizing::new(
        crypto
            .aes_cbc_decrypt(
                material.decryption_key().as_bytes(),
                material.iv(),
                &ciphertext,
            )
            .map_err(|e| {
                debug!(error = %e, "cipher rejected the derived key");
                PagelockError::WrongPassword
            })?,
    );

    // Lossy on purpose: tampered blocks must reach the HMAC check instead
    // of failing here as a wrong password.
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if !text.starts_with(SENTINEL) {
        debug!("decrypted successfully but the known prefix is missing");
        return Err(PagelockError::WrongPassword);
    }

    Ok(DecryptedContent { bytes, text })
}
