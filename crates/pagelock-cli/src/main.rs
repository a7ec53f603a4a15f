//! Pagelock CLI - unlock password-protected static pages from the terminal
//!
//! This is the command-line interface for Pagelock. It wires the core
//! unlock flow to a file-backed key cache, environment variables and
//! interactive prompts.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;

use clap::Parser;
use pagelock_core::VERSION;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::{Cli, Commands};
use crate::commands::{
    handle_completions, handle_init, handle_lock, handle_seal, handle_status, handle_unlock,
};
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            cli_err.exit()
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins, then --verbose, then warnings only.
fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let subscriber = FmtSubscriber::builder()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Unlock(args)) => {
            handle_unlock(cli, args)?;
        }
        Some(Commands::Lock(args)) => {
            handle_lock(cli, args)?;
        }
        Some(Commands::Status(args)) => {
            handle_status(cli, args)?;
        }
        Some(Commands::Seal(args)) => {
            handle_seal(cli, args)?;
        }
        Some(Commands::Init(args)) => {
            handle_init(cli, args)?;
        }
        Some(Commands::Completions(args)) => {
            handle_completions(args)?;
        }
        None => {
            println!("Pagelock v{}", VERSION);
            println!("\nQuickstart:");
            println!("  pagelock seal post.html --path /posts/secret/ -o post.json");
            println!("  pagelock unlock post.json");
            println!("  pagelock status post.json");
            println!("  pagelock lock post.json");
            println!("\nRun `pagelock --help` for full usage.");
        }
    }

    Ok(())
}
