//! Implementation of the `claimchain events` command.

use claimchain::context::ClaimContext;
use claimchain::error::Result;
use claimchain::events::EventLog;

/// Execute the `claimchain events` command.
///
/// The log is append-only and read without the store lock; a line being
/// written concurrently is skipped.
pub fn cmd_events(ctx: &ClaimContext, args: crate::cli::EventsArgs) -> Result<()> {
    let events = EventLog::new(ctx.events_path()).read(args.limit)?;

    if events.is_empty() && !args.json {
        println!("No events recorded.");
        return Ok(());
    }

    for event in &events {
        if args.json {
            println!("{}", event.to_ndjson_line()?);
            continue;
        }
        println!(
            "{}  {:<8}  {}{}",
            event.ts.format("%Y-%m-%d %H:%M:%S"),
            event.action.to_string(),
            event.actor,
            event
                .chain
                .as_deref()
                .map(|chain| format!("  {}", chain))
                .unwrap_or_default()
        );
    }
    Ok(())
}
