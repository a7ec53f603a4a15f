use std::path::{Path, PathBuf};

use pagelock_core::ProtectionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PagelockConfig {
    #[serde(default)]
    pub protection: ProtectionConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub enabled: bool,
    pub dir: Option<String>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl CacheSection {
    /// Directory of the file-backed key store.
    pub fn store_dir(&self) -> anyhow::Result<PathBuf> {
        match self.dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
            _ => default_store_dir(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("keys"))
}

pub fn read_config(path: &Path) -> anyhow::Result<PagelockConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &PagelockConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pagelock"));
        }
    }
    Ok(home_dir()?.join(".config").join("pagelock"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("pagelock"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("pagelock"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelock_core::config::{DEFAULT_IV_ITERATIONS, DEFAULT_KEY_SALT};

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: PagelockConfig = toml::from_str("[protection]\nkey_iterations = 2048\n").unwrap();
        assert_eq!(config.protection.key_iterations, 2048);
        assert_eq!(config.protection.iv_iterations, DEFAULT_IV_ITERATIONS);
        assert_eq!(config.protection.key_salt, DEFAULT_KEY_SALT);
        assert!(config.cache.enabled);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn test_written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = PagelockConfig::default();
        config.cache.enabled = false;
        config.protection.messages.wrong_password = "nope".to_string();

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert!(!loaded.cache.enabled);
        assert_eq!(loaded.protection, config.protection);
    }

    #[test]
    fn test_explicit_store_dir_wins() {
        let section = CacheSection {
            enabled: true,
            dir: Some("/tmp/pagelock-keys".to_string()),
        };
        assert_eq!(
            section.store_dir().unwrap(),
            PathBuf::from("/tmp/pagelock-keys")
        );
    }
}
