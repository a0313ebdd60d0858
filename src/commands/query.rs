//! Read-only commands: `lookup`, `list`, and `show`.

use super::{display_status, open_manager, print_chain, print_json};
use crate::cli::{ListArgs, LookupArgs, ShowArgs};
use chrono::Utc;
use claimchain::context::ClaimContext;
use claimchain::error::{ClaimError, Result};

/// Execute the `claimchain lookup` command.
pub fn cmd_lookup(ctx: &ClaimContext, args: LookupArgs) -> Result<()> {
    let (_, manager) = open_manager(ctx)?;
    let holder = manager.lookup(&args.file)?;

    if args.json {
        return print_json(&holder);
    }

    match holder {
        Some(chain) => print_chain(&chain),
        None => println!("{} is not claimed.", args.file),
    }
    Ok(())
}

/// Execute the `claimchain list` command.
pub fn cmd_list(ctx: &ClaimContext, args: ListArgs) -> Result<()> {
    let (_, manager) = open_manager(ctx)?;
    let chains = match &args.agent {
        Some(agent) => manager.list_for_agent(agent)?,
        None => manager.list_active()?,
    };

    if args.json {
        return print_json(&chains);
    }

    if chains.is_empty() {
        println!("No active chains.");
        return Ok(());
    }

    let now = Utc::now();
    println!("Active chains ({}):", chains.len());
    println!();
    for chain in &chains {
        println!(
            "  {}  {}  {} file(s)  expires in {}s",
            chain.chain_id,
            chain.agent_id,
            chain.files.len(),
            chain.remaining(now).num_seconds()
        );
    }
    Ok(())
}

/// Execute the `claimchain show` command.
pub fn cmd_show(ctx: &ClaimContext, args: ShowArgs) -> Result<()> {
    let (_, manager) = open_manager(ctx)?;
    let chain = manager.get(&args.chain_id)?.ok_or_else(|| {
        ClaimError::InvalidInput(format!(
            "chain '{}' not found.\n\n\
             Finished chains are pruned after `retention_seconds`.\n\
             Use `claimchain list` to see live chains.",
            args.chain_id
        ))
    })?;

    if args.json {
        return print_json(&chain);
    }

    println!("================================================================================");
    println!("{} [{}]", chain.chain_id, display_status(&chain));
    println!("================================================================================");
    println!();
    print_chain(&chain);
    Ok(())
}
