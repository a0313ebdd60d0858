//! Implementation of the `claimchain lock status` command.

use super::print_json;
use crate::cli::LockStatusArgs;
use claimchain::config::Config;
use claimchain::context::ClaimContext;
use claimchain::error::Result;
use claimchain::locks::lock_status;
use serde_json::json;

/// Execute the `claimchain lock status` command.
///
/// Diagnostic only: a stale lock is reported, never broken. The OS drops a
/// crashed holder's lock on its own.
pub fn cmd_lock_status(ctx: &ClaimContext, args: LockStatusArgs) -> Result<()> {
    let config = Config::load_or_default(ctx.config_path())?;
    let info = lock_status(&ctx.lock_path(), config.lock_stale_seconds)?;

    if args.json {
        return print_json(&json!({
            "path": info.path.display().to_string(),
            "held": info.held,
            "is_stale": info.is_stale,
            "metadata": info.metadata,
        }));
    }

    if !info.held {
        println!("Store lock is free.");
        println!("    Path:       {}", info.path.display());
        return Ok(());
    }

    println!("Store lock is held:");
    if let Some(meta) = &info.metadata {
        println!("    Owner:      {}", meta.owner);
        if let Some(pid) = meta.pid {
            println!("    PID:        {}", pid);
        }
        println!("    Created:    {}", meta.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("    Age:        {}", meta.age_string());
        println!("    Action:     {}", meta.action);
    }
    if info.is_stale {
        println!(
            "    Status:     STALE (held longer than {}s)",
            config.lock_stale_seconds
        );
    }
    println!("    Path:       {}", info.path.display());
    Ok(())
}
