//! Implementation of the `claimchain release` and `claimchain complete` commands.

use super::open_manager;
use crate::cli::FinishArgs;
use claimchain::context::ClaimContext;
use claimchain::error::{ClaimError, Result};

/// Execute the `claimchain release` command.
pub fn cmd_release(ctx: &ClaimContext, args: FinishArgs) -> Result<()> {
    let (_, manager) = open_manager(ctx)?;
    let released = manager.release(&args.chain_id, &args.agent)?;
    report("released", released, &args)
}

/// Execute the `claimchain complete` command.
pub fn cmd_complete(ctx: &ClaimContext, args: FinishArgs) -> Result<()> {
    let (_, manager) = open_manager(ctx)?;
    let completed = manager.complete(&args.chain_id, &args.agent)?;
    report("completed", completed, &args)
}

/// A refused finish is a user error at the CLI, even though the library
/// reports it as `Ok(false)`.
fn report(verb: &str, done: bool, args: &FinishArgs) -> Result<()> {
    if !done {
        return Err(ClaimError::InvalidInput(format!(
            "chain '{}' was not {}: it does not exist, is no longer active, \
             or is not owned by '{}'.\n\n\
             Use `claimchain show {}` to inspect it.",
            args.chain_id, verb, args.agent, args.chain_id
        )));
    }

    println!("{} {}", capitalize(verb), args.chain_id);
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
