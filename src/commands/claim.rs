//! Implementation of the `claimchain claim` command.

use super::{open_manager, print_json};
use crate::cli::ClaimArgs;
use claimchain::context::ClaimContext;
use claimchain::error::Result;
use serde_json::json;

/// Execute the `claimchain claim` command.
///
/// A blocked claim is returned as an error so the process exits with
/// [`claimchain::exit_codes::BLOCKED`]. With `--json` the conflict is also
/// written to stdout.
pub fn cmd_claim(ctx: &ClaimContext, args: ClaimArgs) -> Result<()> {
    let (config, manager) = open_manager(ctx)?;
    let ttl = args.ttl.unwrap_or(config.default_ttl_seconds);

    let chain = match manager.claim(&args.agent, &args.files, ttl) {
        Ok(chain) => chain,
        Err(err) => {
            if args.json
                && let Some(conflict) = err.as_blocked()
            {
                print_json(&json!({ "claimed": false, "conflict": conflict }))?;
            }
            return Err(err);
        }
    };

    if args.json {
        return print_json(&json!({ "claimed": true, "chain": chain }));
    }

    println!("{}", chain.chain_id);
    println!(
        "Claimed {} file(s) for {} (expires in {}s)",
        chain.files.len(),
        chain.agent_id,
        chain.ttl_seconds
    );
    Ok(())
}
