//! Key store selection.

use pagelock_core::storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::debug;

use crate::config::CacheSection;

/// The store an invocation runs against.
///
/// With caching disabled nothing outlives the process, so every run starts
/// locked.
pub enum PageStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl PageStore {
    pub fn open(cache: &CacheSection) -> anyhow::Result<Self> {
        if !cache.enabled {
            debug!("key cache disabled; using a per-process store");
            return Ok(PageStore::Memory(MemoryStore::new()));
        }
        let dir = cache.store_dir()?;
        let store = FileStore::open(dir.clone())
            .map_err(|e| anyhow::anyhow!("Failed to open key store {}: {}", dir.display(), e))?;
        Ok(PageStore::File(store))
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, PageStore::File(_))
    }
}

impl KeyValueStore for PageStore {
    fn get(&self, key: &str) -> pagelock_core::Result<Option<String>> {
        match self {
            PageStore::File(store) => store.get(key),
            PageStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> pagelock_core::Result<()> {
        match self {
            PageStore::File(store) => store.set(key, value),
            PageStore::Memory(store) => store.set(key, value),
        }
    }

    fn delete(&mut self, key: &str) -> pagelock_core::Result<()> {
        match self {
            PageStore::File(store) => store.delete(key),
            PageStore::Memory(store) => store.delete(key),
        }
    }
}
