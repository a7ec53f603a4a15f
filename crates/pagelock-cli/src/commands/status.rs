use pagelock_core::cache::KeyCache;
use pagelock_core::crypto::NativeCrypto;
use pagelock_core::unlock::verify_material;
use serde::Serialize;

use crate::app::{load_config, read_page, PageStore};
use crate::cli::{Cli, StatusArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CacheStatus {
    /// The cached key unlocks the page.
    Usable,
    /// A record exists but does not unlock this page.
    Stale,
    /// A record exists but cannot be parsed.
    Corrupt,
    Empty,
    Disabled,
}

impl CacheStatus {
    fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Usable => "usable",
            CacheStatus::Stale => "stale",
            CacheStatus::Corrupt => "corrupt",
            CacheStatus::Empty => "empty",
            CacheStatus::Disabled => "disabled",
        }
    }
}

/// Report the cache state without modifying it.
pub fn handle_status(cli: &Cli, args: &StatusArgs) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let page = read_page(&args.page)?;
    let store = PageStore::open(&config.cache)?;

    let status = if !store.is_persistent() {
        CacheStatus::Disabled
    } else {
        let cache = KeyCache::new(&config.protection, &page.path);
        match cache.read(&store) {
            Ok(Some(material))
                if verify_material(&NativeCrypto, &page.payload, &material).is_ok() =>
            {
                CacheStatus::Usable
            }
            Ok(Some(_)) => CacheStatus::Stale,
            Ok(None) => CacheStatus::Empty,
            Err(_) => CacheStatus::Corrupt,
        }
    };

    if args.json {
        let value = serde_json::json!({
            "path": page.path,
            "cache": status,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("page={}", page.path);
        println!("cache={}", status.as_str());
    }
    Ok(())
}
