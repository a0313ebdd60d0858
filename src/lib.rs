//! claimchain: file-backed claim chains for coordinating agents.
//!
//! Independent agents (threads or whole processes) reserve sets of file paths
//! before working on them. A reservation is a [`ClaimChain`]: it belongs to one
//! agent, covers a set of canonical paths, and lasts until it is released,
//! completed, or its TTL runs out. State lives in one JSON document guarded by
//! an OS exclusive file lock, so every participant on the host sees the same
//! serialized history.
//!
//! ```no_run
//! use claimchain::{ClaimContext, ClaimManager, Config};
//!
//! let ctx = ClaimContext::resolve(None)?;
//! let manager = ClaimManager::open(&ctx, &Config::load_or_default(ctx.config_path())?);
//!
//! let chain = manager.claim("agent-7", ["src/lib.rs", "src/main.rs"], 600)?;
//! // ... edit the files ...
//! manager.complete(&chain.chain_id, "agent-7")?;
//! # Ok::<(), claimchain::ClaimError>(())
//! ```

pub mod chain;
pub mod claims;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod locks;
pub mod store;

pub use chain::{ChainStatus, ClaimChain};
pub use claims::{BlockedConflict, ClaimManager, ClaimOutcome};
pub use config::Config;
pub use context::ClaimContext;
pub use error::{ClaimError, Result};
pub use store::{ClaimStore, StoreSettings};
