//! Per-page cache of derived key material.
//!
//! One JSON record per protected page path:
//!
//! ```json
//! { "iv": "<hex>", "dk": { JWK }, "hmk": { JWK } }
//! ```
//!
//! The raw password is never stored. A loaded record is only a candidate:
//! the orchestrator runs it through the same decrypt and verify pipeline as a
//! typed password and invalidates it on any failure.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ProtectionConfig;
use crate::crypto::{export_key, import_key, DerivedKeyMaterial, JsonWebKey, KeyUsage, IV_LENGTH};
use crate::error::{PagelockError, Result};
use crate::storage::KeyValueStore;

/// Serialized form of [`DerivedKeyMaterial`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub iv: String,
    pub dk: JsonWebKey,
    pub hmk: JsonWebKey,
}

impl CacheRecord {
    pub fn from_material(material: &DerivedKeyMaterial) -> Self {
        Self {
            iv: hex::encode(material.iv()),
            dk: export_key(material.decryption_key(), KeyUsage::Decrypt),
            hmk: export_key(material.integrity_key(), KeyUsage::Verify),
        }
    }

    pub fn into_material(self) -> Result<DerivedKeyMaterial> {
        let iv_bytes = hex::decode(self.iv.trim())
            .map_err(|e| PagelockError::CacheCorruption(format!("iv is not hex: {}", e)))?;
        let iv: [u8; IV_LENGTH] = iv_bytes.as_slice().try_into().map_err(|_| {
            PagelockError::CacheCorruption(format!(
                "iv must be {} bytes, found {}",
                IV_LENGTH,
                iv_bytes.len()
            ))
        })?;
        let decryption_key = import_key(&self.dk, KeyUsage::Decrypt)?;
        let integrity_key = import_key(&self.hmk, KeyUsage::Verify)?;
        Ok(DerivedKeyMaterial::new(decryption_key, integrity_key, iv))
    }
}

/// Cache handle for a single page.
#[derive(Debug, Clone)]
pub struct KeyCache {
    storage_key: String,
}

impl KeyCache {
    pub fn new(config: &ProtectionConfig, page_path: &str) -> Self {
        Self {
            storage_key: config.storage_key(page_path),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Write the record for this page, replacing any previous one.
    pub fn save<S>(&self, store: &mut S, material: &DerivedKeyMaterial) -> Result<()>
    where
        S: KeyValueStore + ?Sized,
    {
        let record = CacheRecord::from_material(material);
        let json = serde_json::to_string(&record)
            .map_err(|e| PagelockError::Storage(format!("Failed to encode cache record: {}", e)))?;
        store.set(&self.storage_key, &json)
    }

    /// Cached material, or `None` when the record is absent or unusable.
    pub fn load<S>(&self, store: &S) -> Option<DerivedKeyMaterial>
    where
        S: KeyValueStore + ?Sized,
    {
        match self.read(store) {
            Ok(material) => material,
            Err(err) => {
                warn!(key = %self.storage_key, error = %err, "ignoring unusable cache record");
                None
            }
        }
    }

    /// Like [`KeyCache::load`], but reports a present-but-unusable record as
    /// `CacheCorruption` so the caller can invalidate it.
    pub fn read<S>(&self, store: &S) -> Result<Option<DerivedKeyMaterial>>
    where
        S: KeyValueStore + ?Sized,
    {
        let Some(json) = store.get(&self.storage_key)? else {
            return Ok(None);
        };
        let record: CacheRecord = serde_json::from_str(&json)
            .map_err(|e| PagelockError::CacheCorruption(e.to_string()))?;
        record.into_material().map(Some)
    }

    /// Drop the record for this page.
    pub fn invalidate<S>(&self, store: &mut S) -> Result<()>
    where
        S: KeyValueStore + ?Sized,
    {
        store.delete(&self.storage_key)
    }
}
