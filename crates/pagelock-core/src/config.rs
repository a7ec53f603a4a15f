//! Deployment-wide protection settings.
//!
//! Every value here must match what the build step used when sealing the
//! page, otherwise every password looks wrong.

use serde::{Deserialize, Serialize};

use crate::error::{PagelockError, Result};

/// Salt used for the decryption and integrity keys.
pub const DEFAULT_KEY_SALT: &str = "hexo-blog-encrypt的作者们都是大帅比!";

/// Salt used for the IV.
pub const DEFAULT_IV_SALT: &str = "hexo-blog-encrypt是地表最强Hexo加密插件!";

/// PBKDF2 rounds for the key pair.
pub const DEFAULT_KEY_ITERATIONS: u32 = 1024;

/// PBKDF2 rounds for the IV.
pub const DEFAULT_IV_ITERATIONS: u32 = 512;

/// Known prefix the build step prepends to every plaintext.
pub const SENTINEL: &str = "<hbe-prefix></hbe-prefix>";

/// Prefix for cache record keys; the page path is appended.
pub const DEFAULT_STORAGE_PREFIX: &str = "hexo-blog-encrypt:#";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    pub key_salt: String,
    pub iv_salt: String,
    pub key_iterations: u32,
    pub iv_iterations: u32,
    pub storage_prefix: String,
    pub messages: Messages,
}

/// Alert texts shown to the user. Pages may override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub wrong_password: String,
    pub wrong_hash: String,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            key_salt: DEFAULT_KEY_SALT.to_string(),
            iv_salt: DEFAULT_IV_SALT.to_string(),
            key_iterations: DEFAULT_KEY_ITERATIONS,
            iv_iterations: DEFAULT_IV_ITERATIONS,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            messages: Messages::default(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            wrong_password: "Oh, this is an invalid password. Check and try again, please."
                .to_string(),
            wrong_hash: "Oh, the decrypted content could not be verified.".to_string(),
        }
    }
}

impl ProtectionConfig {
    /// Reject settings that cannot produce working key material.
    pub fn validate(&self) -> Result<()> {
        if self.key_iterations == 0 || self.iv_iterations == 0 {
            return Err(PagelockError::InvalidInput(
                "PBKDF2 iteration counts must be greater than zero".to_string(),
            ));
        }
        if self.key_salt.is_empty() || self.iv_salt.is_empty() {
            return Err(PagelockError::InvalidInput(
                "Salts cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage key of the cache record for a page path.
    pub fn storage_key(&self, page_path: &str) -> String {
        format!("{}{}", self.storage_prefix, page_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ProtectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = ProtectionConfig {
            iv_iterations: 0,
            ..ProtectionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("iteration counts"));
    }

    #[test]
    fn test_storage_key_appends_path() {
        let config = ProtectionConfig::default();
        assert_eq!(
            config.storage_key("/2024/01/secret/"),
            "hexo-blog-encrypt:#/2024/01/secret/"
        );
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ProtectionConfig =
            serde_json::from_str(r#"{"key_iterations": 2048}"#).unwrap();
        assert_eq!(config.key_iterations, 2048);
        assert_eq!(config.iv_iterations, DEFAULT_IV_ITERATIONS);
        assert_eq!(config.key_salt, DEFAULT_KEY_SALT);
    }
}
