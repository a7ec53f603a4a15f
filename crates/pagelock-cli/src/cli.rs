use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use pagelock_core::VERSION;

/// Pagelock - unlock password-protected static pages from the terminal
#[derive(Parser)]
#[command(name = "pagelock")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "PAGELOCK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show diagnostic logs (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments for the `unlock` command
#[derive(Args)]
pub struct UnlockArgs {
    /// Protected page document (JSON)
    #[arg(value_name = "PAGE")]
    pub page: String,

    /// Write the revealed fragment to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for commands that only need the page
#[derive(Args)]
pub struct PageArgs {
    /// Protected page document (JSON)
    #[arg(value_name = "PAGE")]
    pub page: String,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Protected page document (JSON)
    #[arg(value_name = "PAGE")]
    pub page: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `seal` command
#[derive(Args)]
pub struct SealArgs {
    /// HTML fragment to protect (reads stdin when omitted or "-")
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Page path the cached key will be keyed by
    #[arg(long, value_name = "PATH")]
    pub path: String,

    /// Write the page document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Alert shown when the password is wrong
    #[arg(long, value_name = "TEXT")]
    pub wrong_password_message: Option<String>,

    /// Alert shown when the content fails verification
    #[arg(long, value_name = "TEXT")]
    pub wrong_hash_message: Option<String>,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reveal a protected page, using the cached key when possible
    Unlock(UnlockArgs),

    /// Forget the cached key for a page ("encrypt again")
    Lock(PageArgs),

    /// Report whether a page can be unlocked from the cache
    Status(StatusArgs),

    /// Encrypt and sign an HTML fragment into a page document
    Seal(SealArgs),

    /// Write a default config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
