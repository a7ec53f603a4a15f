//! Path resolution for the config file and page documents.

use std::path::{Path, PathBuf};

use pagelock_core::payload::ProtectedPage;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, PagelockConfig};
use crate::errors::CliError;

/// Resolve the config file path: `--config` / PAGELOCK_CONFIG, else XDG.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(value) = cli.config.as_deref() {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config, falling back to defaults when no file exists.
///
/// An explicitly named config that is missing is an error.
pub fn load_config(cli: &Cli) -> anyhow::Result<PagelockConfig> {
    let path = resolve_config_path(cli)?;
    if path.exists() {
        let config = read_config(&path)?;
        config
            .protection
            .validate()
            .map_err(|e| CliError::invalid_input(format!("{}: {}", path.display(), e)))?;
        return Ok(config);
    }
    if cli.config.is_some() {
        return Err(CliError::not_found(
            format!("No config found at {}", path.display()),
            "Hint: Run `pagelock init` or drop --config to use the defaults.",
        )
        .into());
    }
    Ok(PagelockConfig::default())
}

/// Read and validate a protected page document.
pub fn read_page(path: &str) -> anyhow::Result<ProtectedPage> {
    let page_path = Path::new(path);
    if !page_path.exists() {
        return Err(CliError::not_found(
            format!("No page document at {}", page_path.display()),
            "Hint: Create one with `pagelock seal <INPUT> --path <PATH>`.",
        )
        .into());
    }
    let contents = std::fs::read_to_string(page_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", page_path.display(), e))?;
    ProtectedPage::from_json(&contents).map_err(|e| {
        CliError::invalid_input(format!(
            "{} is not a protected page document: {}",
            page_path.display(),
            e
        ))
        .into()
    })
}
