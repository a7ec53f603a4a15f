//! Unlocking a page with cache, environment and prompt fallbacks.

use std::io::IsTerminal;

use pagelock_core::crypto::NativeCrypto;
use pagelock_core::unlock::{Rejection, RevealedContent};
use pagelock_core::{Orchestrator, UnlockObserver, UnlockOutcome};
use tracing::debug;

use crate::cli::Cli;
use crate::constants::MAX_PASSWORD_ATTEMPTS;
use crate::errors::CliError;
use crate::helpers::{env_password, prompt_password};

use super::resolver::{load_config, read_page};
use super::store::PageStore;

pub type PageOrchestrator = Orchestrator<NativeCrypto, PageStore>;

/// Prints alerts to stderr.
struct TerminalObserver;

impl UnlockObserver for TerminalObserver {
    fn on_unlocked(&self, content: &RevealedContent) {
        debug!(bytes = content.html().len(), "content revealed");
    }

    fn on_alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Build an orchestrator for the page document at `page`.
pub fn open_page(cli: &Cli, page: &str) -> anyhow::Result<PageOrchestrator> {
    let config = load_config(cli)?;
    let page = read_page(page)?;
    let store = PageStore::open(&config.cache)?;
    let orchestrator = Orchestrator::new(config.protection, NativeCrypto, store, page)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(orchestrator)
}

/// Reveal a page: cached key first, then PAGELOCK_PASSWORD, then prompts.
pub fn unlock_with_retry(
    cli: &Cli,
    page: &str,
    no_input: bool,
) -> anyhow::Result<RevealedContent> {
    let interactive = std::io::stdin().is_terminal() && !no_input;
    let mut orchestrator = open_page(cli, page)?;
    orchestrator.add_observer(Box::new(TerminalObserver));

    // Try cache first
    match orchestrator.resume() {
        UnlockOutcome::Unlocked => {
            if interactive && !cli.quiet {
                eprintln!("Using cached key");
            }
            return revealed(&orchestrator);
        }
        UnlockOutcome::Rejected(Rejection::CacheCorruption) => {
            if !cli.quiet {
                eprintln!("Cached key was unreadable and has been removed.");
            }
        }
        _ => {}
    }

    if let Some(password) = env_password() {
        return match orchestrator.submit(&password) {
            UnlockOutcome::Unlocked | UnlockOutcome::AlreadyUnlocked => revealed(&orchestrator),
            UnlockOutcome::Rejected(rejection) => Err(CliError::from_rejection(rejection).into()),
            UnlockOutcome::NoCachedKey => Err(anyhow::anyhow!("Unexpected unlock outcome")),
        };
    }

    let max_attempts: u32 = if interactive { MAX_PASSWORD_ATTEMPTS } else { 1 };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let password = prompt_password(interactive)?;
        match orchestrator.submit(&password) {
            UnlockOutcome::Unlocked | UnlockOutcome::AlreadyUnlocked => {
                return revealed(&orchestrator);
            }
            UnlockOutcome::Rejected(Rejection::IntegrityFailure) => {
                // Retyping the same password cannot fix tampered content.
                return Err(CliError::from_rejection(Rejection::IntegrityFailure).into());
            }
            UnlockOutcome::Rejected(rejection) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    if max_attempts == 1 {
                        return Err(CliError::from_rejection(rejection).into());
                    }
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed password attempts.",
                        "Hint: The page cannot be revealed without its password.",
                    )
                    .into());
                }
                eprintln!(
                    "{} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            UnlockOutcome::NoCachedKey => {
                return Err(anyhow::anyhow!("Unexpected unlock outcome"));
            }
        }
    }
}

fn revealed(orchestrator: &PageOrchestrator) -> anyhow::Result<RevealedContent> {
    orchestrator
        .content()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Page reported unlocked without content"))
}
