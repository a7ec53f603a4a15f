//! HMAC-SHA256 integrity verification.
//!
//! The signature covers the full decrypted plaintext, sentinel included.
//! A sentinel match alone never unlocks a page.

use tracing::warn;

use crate::crypto::{CryptoProvider, SecretKey};
use crate::decrypt::DecryptedContent;
use crate::error::{PagelockError, Result};

/// Verify `signature_hex` over the decrypted bytes.
///
/// Comparison is constant-time. Malformed signature hex counts as a
/// mismatch.
pub fn verify_integrity<C>(
    crypto: &C,
    content: &DecryptedContent,
    integrity_key: &SecretKey,
    signature_hex: &str,
) -> Result<()>
where
    C: CryptoProvider + ?Sized,
{
    let signature = match hex::decode(signature_hex.trim()) {
        Ok(signature) => signature,
        Err(e) => {
            warn!(error = %e, "page signature is not valid hex");
            return Err(PagelockError::IntegrityFailure);
        }
    };

    if crypto.hmac_verify(integrity_key.as_bytes(), content.as_bytes(), &signature) {
        Ok(())
    } else {
        warn!(
            signature = %signature_hex.trim(),
            "decrypted content does not match its signature"
        );
        Err(PagelockError::IntegrityFailure)
    }
}

/// Lowercase hex HMAC-SHA256 of a full plaintext (build side).
pub fn sign_content<C>(crypto: &C, integrity_key: &SecretKey, plaintext: &[u8]) -> Result<String>
where
    C: CryptoProvider + ?Sized,
{
    let signature = crypto.hmac_sign(integrity_key.as_bytes(), plaintext)?;
    Ok(hex::encode(signature))
}
