//! Implementation of the `claimchain init` command.
//!
//! Creates the state directory, an empty claim document, and a config.yaml
//! template. Idempotent: existing files are never overwritten.

use claimchain::config::Config;
use claimchain::context::ClaimContext;
use claimchain::error::Result;
use claimchain::events::{Event, EventAction, EventLog};
use claimchain::fs::atomic_write_file;
use claimchain::locks::with_exclusive_lock_using;
use claimchain::store::ClaimDocument;
use serde_json::json;

/// Execute the `claimchain init` command.
pub fn cmd_init(ctx: &ClaimContext) -> Result<()> {
    ctx.ensure_dir()?;

    let config_path = ctx.config_path();
    let config_created = !config_path.exists();
    if config_created {
        atomic_write_file(&config_path, &Config::default().to_yaml()?)?;
    }
    let config = Config::load(&config_path)?;

    // Hold the store lock so a concurrent claim never sees a half-created document.
    let document_created =
        with_exclusive_lock_using(&ctx.lock_path(), &config.lock_settings(), "init", || {
            let document_path = ctx.document_path();
            if document_path.exists() {
                return Ok(false);
            }
            ClaimDocument::empty().save(&document_path)?;

            let event = Event::local(EventAction::Init).with_details(json!({
                "state_dir": ctx.state_dir.display().to_string(),
                "config_created": config_created,
            }));
            EventLog::new(ctx.events_path()).append(&event)?;
            Ok(true)
        })?;

    if document_created || config_created {
        println!("Initialized claim state in {}", ctx.state_dir.display());
    } else {
        println!("Claim state already initialized in {}", ctx.state_dir.display());
    }
    println!("  Document: {}", ctx.document_path().display());
    println!("  Config:   {}", config_path.display());

    Ok(())
}
