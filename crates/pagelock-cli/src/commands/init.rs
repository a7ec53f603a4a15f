use crate::app::resolve_config_path;
use crate::cli::{Cli, InitArgs};
use crate::config::{write_config, PagelockConfig};
use crate::errors::CliError;

pub fn handle_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let path = resolve_config_path(cli)?;
    if path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            path.display()
        ))
        .into());
    }

    let config = PagelockConfig::default();
    write_config(&path, &config)?;
    if !cli.quiet {
        println!("Wrote config to {}", path.display());
        println!("Keys are cached in {}", config.cache.store_dir()?.display());
    }
    Ok(())
}
