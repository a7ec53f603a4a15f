//! Page payloads and build-side sealing.
//!
//! The static page embeds an [`EncryptedPayload`] plus localized alert
//! texts. [`ProtectedPage`] is the JSON document a host reads to get both;
//! [`seal`] produces one from a plaintext fragment and a password.

use serde::{Deserialize, Serialize};

use crate::config::{Messages, ProtectionConfig, SENTINEL};
use crate::crypto::{derive_key_material, CryptoProvider};
use crate::error::{PagelockError, Result};
use crate::integrity::sign_content;

/// Ciphertext and signature as embedded in the page, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub hmac_digest: String,
}

/// One protected region of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedPage {
    /// Page path; the cache record is keyed by it.
    pub path: String,
    #[serde(flatten)]
    pub payload: EncryptedPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_password_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrong_hash_message: Option<String>,
}

impl ProtectedPage {
    pub fn from_json(json: &str) -> Result<Self> {
        let page: ProtectedPage = serde_json::from_str(json)?;
        if page.path.trim().is_empty() {
            return Err(PagelockError::InvalidInput(
                "Protected page has an empty path".to_string(),
            ));
        }
        if page.payload.ciphertext.trim().is_empty() {
            return Err(PagelockError::InvalidInput(
                "Protected page has no ciphertext".to_string(),
            ));
        }
        Ok(page)
    }

    /// Alert texts for this page, falling back to the deployment defaults.
    pub fn messages(&self, defaults: &Messages) -> Messages {
        Messages {
            wrong_password: self
                .wrong_password_message
                .clone()
                .unwrap_or_else(|| defaults.wrong_password.clone()),
            wrong_hash: self
                .wrong_hash_message
                .clone()
                .unwrap_or_else(|| defaults.wrong_hash.clone()),
        }
    }
}

/// Encrypt and sign `fragment` under `password`.
///
/// The sentinel is prepended before encryption and is covered by the
/// signature, matching what the unlock pipeline checks.
///
/// # Examples
///
/// ```
/// use pagelock_core::crypto::{derive_key_material, NativeCrypto};
/// use pagelock_core::decrypt::decrypt_content;
/// use pagelock_core::payload::seal;
/// use pagelock_core::ProtectionConfig;
///
/// let config = ProtectionConfig::default();
/// let payload = seal(&NativeCrypto, "hunter2", "<p>hi</p>", &config).unwrap();
///
/// let material = derive_key_material(&NativeCrypto, "hunter2", &config);
/// let content = decrypt_content(&NativeCrypto, &payload.ciphertext, &material).unwrap();
/// assert_eq!(content.body(), "<p>hi</p>");
/// ```
pub fn seal<C>(
    crypto: &C,
    password: &str,
    fragment: &str,
    config: &ProtectionConfig,
) -> Result<EncryptedPayload>
where
    C: CryptoProvider + ?Sized,
{
    config.validate()?;
    let material = derive_key_material(crypto, password, config);
    let plaintext = format!("{}{}", SENTINEL, fragment);

    let ciphertext = crypto.aes_cbc_encrypt(
        material.decryption_key().as_bytes(),
        material.iv(),
        plaintext.as_bytes(),
    )?;
    let hmac_digest = sign_content(crypto, material.integrity_key(), plaintext.as_bytes())?;

    Ok(EncryptedPayload {
        ciphertext: hex::encode(ciphertext),
        hmac_digest,
    })
}
