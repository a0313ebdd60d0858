//! CLI argument parsing for claimchain.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// claimchain: reserve files across cooperating agents.
///
/// Agents claim sets of paths before touching them. Claims from different
/// agents never overlap; a conflicting claim is refused (exit code 2) with
/// the blocking chains listed on stderr.
#[derive(Parser, Debug)]
#[command(name = "claimchain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Shared state directory (default: .claims under the working directory).
    #[arg(long, global = true, env = "CLAIMCHAIN_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Enable debug logging (overridden by CLAIMCHAIN_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for claimchain.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the state directory.
    ///
    /// Creates the directory, an empty claim document, and a config.yaml
    /// template. Safe to run more than once.
    Init,

    /// Claim a set of files for an agent.
    ///
    /// All files are reserved or none are.
    Claim(ClaimArgs),

    /// Release a chain without completing its work.
    Release(FinishArgs),

    /// Mark a chain's work as completed.
    Complete(FinishArgs),

    /// Show which live chain holds a file.
    Lookup(LookupArgs),

    /// List live chains.
    List(ListArgs),

    /// Show any retained chain by id, including finished ones.
    Show(ShowArgs),

    /// Lock diagnostics.
    Lock(LockCommand),

    /// Show recent audit events.
    Events(EventsArgs),
}

/// Arguments for the `claim` command.
#[derive(Parser, Debug)]
pub struct ClaimArgs {
    /// Agent making the claim.
    #[arg(long)]
    pub agent: String,

    /// Lifetime in seconds (default: `default_ttl_seconds` from config).
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Files to claim.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<String>,
}

/// Arguments for the `release` and `complete` commands.
#[derive(Parser, Debug)]
pub struct FinishArgs {
    /// Chain id returned by `claim`.
    pub chain_id: String,

    /// Agent that owns the chain.
    #[arg(long)]
    pub agent: String,
}

/// Arguments for the `lookup` command.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// File to look up.
    pub file: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only chains owned by this agent.
    #[arg(long)]
    pub agent: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Chain id to show.
    pub chain_id: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Report whether the store lock is currently held, and by whom.
    Status(LockStatusArgs),
}

/// Arguments for the `lock status` command.
#[derive(Parser, Debug)]
pub struct LockStatusArgs {
    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `events` command.
#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Show only the last N events.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print events as NDJSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
