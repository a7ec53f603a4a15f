use std::io::IsTerminal;

use pagelock_core::crypto::NativeCrypto;
use pagelock_core::payload::{seal, ProtectedPage};
use tracing::info;

use crate::app::load_config;
use crate::cli::{Cli, SealArgs};
use crate::errors::CliError;
use crate::helpers::{prompt_new_password, read_input, write_output};

/// Encrypt and sign a fragment into a page document.
pub fn handle_seal(cli: &Cli, args: &SealArgs) -> anyhow::Result<()> {
    if args.path.trim().is_empty() {
        return Err(CliError::invalid_input("--path cannot be empty").into());
    }
    let config = load_config(cli)?;

    let reads_stdin = matches!(args.input.as_deref(), None | Some("-"));
    let fragment = read_input(args.input.as_deref())?;
    if fragment.trim().is_empty() {
        return Err(CliError::invalid_input("Nothing to seal: the input is empty").into());
    }

    let interactive = !reads_stdin && std::io::stdin().is_terminal();
    let password = prompt_new_password(interactive)?;

    let payload = seal(&NativeCrypto, &password, &fragment, &config.protection)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    let page = ProtectedPage {
        path: args.path.clone(),
        payload,
        wrong_password_message: args.wrong_password_message.clone(),
        wrong_hash_message: args.wrong_hash_message.clone(),
    };
    info!(path = %page.path, bytes = fragment.len(), "sealed fragment");

    let mut document = serde_json::to_string_pretty(&page)?;
    document.push('\n');
    write_output(args.output.as_deref(), &document)?;
    if let Some(path) = args.output.as_deref() {
        if !cli.quiet {
            eprintln!("Page document written to {}", path);
        }
    }
    Ok(())
}
