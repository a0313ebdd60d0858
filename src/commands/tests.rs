//! Tests for the command handlers, run against temporary state directories.

use super::*;
use crate::cli::{
    ClaimArgs, EventsArgs, FinishArgs, ListArgs, LockCommand, LockStatusArgs, LookupArgs,
    ShowArgs,
};
use claimchain::chain::ChainStatus;
use claimchain::events::{EventAction, EventLog};
use claimchain::exit_codes;
use claimchain::store::ClaimDocument;
use tempfile::TempDir;

fn test_context() -> (TempDir, ClaimContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = ClaimContext::at(temp_dir.path().join(".claims"));
    (temp_dir, ctx)
}

fn claim(agent: &str, files: &[&str]) -> Command {
    Command::Claim(ClaimArgs {
        agent: agent.to_string(),
        ttl: Some(600),
        json: false,
        files: files.iter().map(|f| f.to_string()).collect(),
    })
}

fn finish_args(chain_id: &str, agent: &str) -> FinishArgs {
    FinishArgs {
        chain_id: chain_id.to_string(),
        agent: agent.to_string(),
    }
}

fn stored_chains(ctx: &ClaimContext) -> Vec<ClaimChain> {
    ClaimDocument::load(&ctx.document_path()).unwrap().chains
}

#[test]
fn test_init_creates_state_and_is_idempotent() {
    let (_temp_dir, ctx) = test_context();

    run(&ctx, Command::Init).unwrap();
    assert!(ctx.is_initialized());
    assert!(ctx.document_path().exists());
    assert!(stored_chains(&ctx).is_empty());

    // Existing state is left alone on a second run.
    run(&ctx, claim("x", &["f1"])).unwrap();
    run(&ctx, Command::Init).unwrap();
    assert_eq!(stored_chains(&ctx).len(), 1);

    let events = EventLog::new(ctx.events_path()).read(None).unwrap();
    let inits = events
        .iter()
        .filter(|e| e.action == EventAction::Init)
        .count();
    assert_eq!(inits, 1);
}

#[test]
fn test_claim_works_without_init() {
    let (_temp_dir, ctx) = test_context();

    run(&ctx, claim("x", &["src/lib.rs"])).unwrap();

    let chains = stored_chains(&ctx);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].agent_id, "x");
    assert_eq!(chains[0].ttl_seconds, 600);
}

#[test]
fn test_claim_uses_configured_default_ttl() {
    let (_temp_dir, ctx) = test_context();
    ctx.ensure_dir().unwrap();
    std::fs::write(ctx.config_path(), "default_ttl_seconds: 42\n").unwrap();

    run(
        &ctx,
        Command::Claim(ClaimArgs {
            agent: "x".to_string(),
            ttl: None,
            json: true,
            files: vec!["f1".to_string()],
        }),
    )
    .unwrap();

    assert_eq!(stored_chains(&ctx)[0].ttl_seconds, 42);
}

#[test]
fn test_blocked_claim_exits_with_blocked_code() {
    let (_temp_dir, ctx) = test_context();

    run(&ctx, claim("x", &["f1", "f2"])).unwrap();
    let err = run(&ctx, claim("y", &["f2"])).unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::BLOCKED);
    assert_eq!(stored_chains(&ctx).len(), 1);
}

#[test]
fn test_release_and_complete_commands() {
    let (_temp_dir, ctx) = test_context();
    run(&ctx, claim("x", &["f1"])).unwrap();
    run(&ctx, claim("x", &["f2"])).unwrap();
    let chains = stored_chains(&ctx);

    run(&ctx, Command::Release(finish_args(&chains[0].chain_id, "x"))).unwrap();
    run(&ctx, Command::Complete(finish_args(&chains[1].chain_id, "x"))).unwrap();

    let statuses: Vec<ChainStatus> = stored_chains(&ctx).iter().map(|c| c.status).collect();
    assert!(statuses.contains(&ChainStatus::Released));
    assert!(statuses.contains(&ChainStatus::Completed));
}

#[test]
fn test_refused_release_is_user_error() {
    let (_temp_dir, ctx) = test_context();
    run(&ctx, claim("x", &["f1"])).unwrap();
    let chain_id = stored_chains(&ctx)[0].chain_id.clone();

    let err = run(&ctx, Command::Release(finish_args(&chain_id, "y"))).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains(&chain_id));

    assert_eq!(stored_chains(&ctx)[0].status, ChainStatus::Active);
}

#[test]
fn test_query_commands_succeed() {
    let (_temp_dir, ctx) = test_context();
    run(&ctx, claim("x", &["f1"])).unwrap();
    let chain_id = stored_chains(&ctx)[0].chain_id.clone();

    for json in [false, true] {
        run(
            &ctx,
            Command::Lookup(LookupArgs {
                file: "./f1".to_string(),
                json,
            }),
        )
        .unwrap();
        run(
            &ctx,
            Command::List(ListArgs {
                agent: Some("x".to_string()),
                json,
            }),
        )
        .unwrap();
        run(
            &ctx,
            Command::Show(ShowArgs {
                chain_id: chain_id.clone(),
                json,
            }),
        )
        .unwrap();
    }
}

#[test]
fn test_show_unknown_chain_is_user_error() {
    let (_temp_dir, ctx) = test_context();

    let err = run(
        &ctx,
        Command::Show(ShowArgs {
            chain_id: "chain-missing".to_string(),
            json: false,
        }),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_corrupt_store_exits_with_store_failure() {
    let (_temp_dir, ctx) = test_context();
    ctx.ensure_dir().unwrap();
    std::fs::write(ctx.document_path(), "{ broken").unwrap();

    let err = run(&ctx, claim("x", &["f1"])).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::STORE_FAILURE);
    assert_eq!(
        std::fs::read_to_string(ctx.document_path()).unwrap(),
        "{ broken"
    );
}

#[test]
fn test_lock_status_and_events_commands() {
    let (_temp_dir, ctx) = test_context();

    // Nothing exists yet: both commands still succeed.
    run(
        &ctx,
        Command::Lock(LockCommand {
            action: LockAction::Status(LockStatusArgs { json: true }),
        }),
    )
    .unwrap();
    run(
        &ctx,
        Command::Events(EventsArgs {
            limit: None,
            json: false,
        }),
    )
    .unwrap();

    run(&ctx, claim("x", &["f1"])).unwrap();
    run(
        &ctx,
        Command::Lock(LockCommand {
            action: LockAction::Status(LockStatusArgs { json: false }),
        }),
    )
    .unwrap();
    run(
        &ctx,
        Command::Events(EventsArgs {
            limit: Some(1),
            json: true,
        }),
    )
    .unwrap();
}

#[test]
fn test_display_status_reports_expired() {
    let now = Utc::now();
    let expired = ClaimChain::new(
        "x",
        Default::default(),
        1,
        now - chrono::Duration::seconds(5),
    );
    assert_eq!(display_status(&expired), "expired");

    let live = ClaimChain::new("x", Default::default(), 60, now);
    assert_eq!(display_status(&live), "active");
}
