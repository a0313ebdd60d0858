//! Audit event log for claimchain.
//!
//! Events are appended as NDJSON (one JSON object per line) to
//! `events.ndjson` in the state directory, so downstream tooling can tell
//! finished work (`complete`) from abandoned work (`release`).
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: init, claim, blocked, release, complete
//! - `actor`: the agent id, or `user@HOST` for administrative actions
//! - `chain`: optional chain id
//! - `details`: freeform object with action-specific details
//!
//! State-changing events are appended by the store after the document has
//! been replaced and before its lock is released. A `blocked` event is
//! appended by the aborted claim while it still holds the lock. Either way
//! the log order matches the commit order.
//!
//! ```no_run
//! use claimchain::events::{Event, EventAction, EventLog};
//! use serde_json::json;
//!
//! let log = EventLog::new(".claims/events.ndjson");
//! let event = Event::new(EventAction::Claim, "agent-7")
//!     .with_chain("chain-1234")
//!     .with_details(json!({"files": ["src/lib.rs"]}));
//! log.append(&event)?;
//! # Ok::<(), claimchain::error::ClaimError>(())
//! ```

use crate::error::{ClaimError, Result};
use crate::locks::get_owner_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// State directory initialized
    Init,
    /// Chain created
    Claim,
    /// Claim refused because of another agent's chain
    Blocked,
    /// Chain released by its owner
    Release,
    /// Chain completed by its owner
    Complete,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Claim => write!(f, "claim"),
            EventAction::Blocked => write!(f, "blocked"),
            EventAction::Release => write!(f, "release"),
            EventAction::Complete => write!(f, "complete"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who performed the action.
    pub actor: String,

    /// Chain the event is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event performed by `actor`, stamped with the current time.
    pub fn new(action: EventAction, actor: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor.into(),
            chain: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Create an event attributed to the local `user@HOST`.
    pub fn local(action: EventAction) -> Self {
        Self::new(action, get_owner_string())
    }

    pub fn with_chain(mut self, chain_id: impl Into<String>) -> Self {
        self.chain = Some(chain_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ClaimError::Io(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append-only NDJSON event file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a single line, creating the file if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ClaimError::Io(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ClaimError::Io(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        // One write call per line keeps concurrent appenders from interleaving.
        file.write_all(format!("{}\n", json_line).as_bytes())
            .map_err(|e| {
                ClaimError::Io(format!(
                    "failed to write event to '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.sync_all().map_err(|e| {
            ClaimError::Io(format!(
                "failed to sync events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read events, oldest first. With `limit`, only the most recent `limit`.
    ///
    /// Lines that fail to parse are skipped.
    pub fn read(&self, limit: Option<usize>) -> Result<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ClaimError::Io(format!(
                "failed to read events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let events: Vec<Event> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        Ok(match limit {
            Some(n) if n < events.len() => events[events.len() - n..].to_vec(),
            _ => events,
        })
    }
}
