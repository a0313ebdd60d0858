//! Command implementations for claimchain.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every handler takes a resolved [`ClaimContext`] so it can
//! be exercised against a temporary state directory.

mod claim;
mod events;
mod finish;
mod init;
mod lock;
mod query;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command, LockAction};
use chrono::Utc;
use claimchain::chain::ClaimChain;
use claimchain::claims::{BlockedConflict, ClaimManager};
use claimchain::config::Config;
use claimchain::context::ClaimContext;
use claimchain::error::{ClaimError, Result};
use serde::Serialize;

/// Dispatch a parsed command line to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = ClaimContext::resolve(cli.state_dir.as_deref())?;
    run(&ctx, cli.command)
}

/// Run `command` against an already-resolved state directory.
pub fn run(ctx: &ClaimContext, command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(ctx),
        Command::Claim(args) => claim::cmd_claim(ctx, args),
        Command::Release(args) => finish::cmd_release(ctx, args),
        Command::Complete(args) => finish::cmd_complete(ctx, args),
        Command::Lookup(args) => query::cmd_lookup(ctx, args),
        Command::List(args) => query::cmd_list(ctx, args),
        Command::Show(args) => query::cmd_show(ctx, args),
        Command::Lock(lock_cmd) => match lock_cmd.action {
            LockAction::Status(args) => lock::cmd_lock_status(ctx, args),
        },
        Command::Events(args) => events::cmd_events(ctx, args),
    }
}

/// Load config (defaults if absent) and open a manager over `ctx`.
fn open_manager(ctx: &ClaimContext) -> Result<(Config, ClaimManager)> {
    let config = Config::load_or_default(ctx.config_path())?;
    let manager = ClaimManager::open(ctx, &config);
    Ok((config, manager))
}

/// Print a blocked claim to stderr with enough detail to retry later.
pub fn print_blocked(conflict: &BlockedConflict) {
    let now = Utc::now();
    eprintln!("Blocked: {}", conflict);
    eprintln!();
    for chain in &conflict.blocking_chains {
        eprintln!(
            "  {} (agent: {}, expires in {}s)",
            chain.chain_id,
            chain.agent_id,
            chain.remaining(now).num_seconds()
        );
        for file in chain.overlap(&conflict.conflicting_files) {
            eprintln!("    {}", file);
        }
    }
}

/// Print a chain as a short human-readable block.
fn print_chain(chain: &ClaimChain) {
    let now = Utc::now();
    println!("{}", chain.chain_id);
    println!("  Agent:      {}", chain.agent_id);
    println!("  Status:     {}", display_status(chain));
    println!(
        "  Claimed:    {}",
        chain.claimed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if chain.is_live(now) {
        println!("  Expires in: {}s", chain.remaining(now).num_seconds());
    }
    if let Some(ended) = chain.ended_at {
        println!("  Ended:      {}", ended.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Files:");
    for file in &chain.files {
        println!("    {}", file);
    }
}

/// Stored status, or `expired` for an active chain past its TTL.
fn display_status(chain: &ClaimChain) -> &'static str {
    if !chain.status.is_terminal() && chain.is_expired(Utc::now()) {
        "expired"
    } else {
        chain.status.as_str()
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ClaimError::Io(format!("failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
