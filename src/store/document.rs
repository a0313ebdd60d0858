//! On-disk format of the shared claim document.

use crate::chain::ClaimChain;
use crate::error::{ClaimError, Result};
use crate::fs::atomic_write_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Every retained chain record, in one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    pub version: u32,
    pub chains: Vec<ClaimChain>,
}

/// Accepted input shapes: the versioned object, or a bare array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentRepr {
    Versioned(ClaimDocument),
    Bare(Vec<ClaimChain>),
}

impl ClaimDocument {
    pub fn new(chains: Vec<ClaimChain>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            chains,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load the document at `path`.
    ///
    /// A missing or blank file is an empty document. Anything unparseable is
    /// reported as [`ClaimError::StoreCorrupt`] and left untouched on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => {
                return Err(ClaimError::Io(format!(
                    "failed to read claim store '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        Self::from_json(&content).map_err(|e| match e {
            ClaimError::StoreCorrupt(msg) => {
                ClaimError::StoreCorrupt(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse a document from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }

        let repr: DocumentRepr = serde_json::from_str(content)
            .map_err(|e| ClaimError::StoreCorrupt(e.to_string()))?;

        match repr {
            DocumentRepr::Versioned(doc) if doc.version == DOCUMENT_VERSION => Ok(doc),
            DocumentRepr::Versioned(doc) => Err(ClaimError::StoreCorrupt(format!(
                "unsupported document version {} (expected {})",
                doc.version, DOCUMENT_VERSION
            ))),
            DocumentRepr::Bare(chains) => Ok(Self::new(chains)),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClaimError::Io(format!("failed to serialize claim store: {}", e)))
    }

    /// Replace the document at `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        atomic_write_file(path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample_chain() -> ClaimChain {
        ClaimChain::new(
            "agent-x",
            BTreeSet::from(["src/lib.rs".to_string()]),
            60,
            Utc::now(),
        )
    }

    #[test]
    fn missing_file_is_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let doc = ClaimDocument::load(&temp_dir.path().join("chains.json")).unwrap();
        assert_eq!(doc, ClaimDocument::empty());
    }

    #[test]
    fn blank_file_is_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chains.json");
        fs::write(&path, "  \n").unwrap();

        assert!(ClaimDocument::load(&path).unwrap().chains.is_empty());
    }

    #[test]
    fn save_then_load_preserves_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chains.json");
        let doc = ClaimDocument::new(vec![sample_chain()]);

        doc.save(&path).unwrap();

        assert_eq!(ClaimDocument::load(&path).unwrap(), doc);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"version\": 1"));
        assert!(raw.contains("\"ttl_seconds\": 60"));
    }

    #[test]
    fn bare_array_is_accepted() {
        let chain = sample_chain();
        let json = serde_json::to_string(&vec![chain.clone()]).unwrap();

        let doc = ClaimDocument::from_json(&json).unwrap();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.chains, vec![chain]);
    }

    #[test]
    fn garbage_is_reported_as_corrupt_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chains.json");
        fs::write(&path, "{\"version\": 1, \"chains\": [").unwrap();

        match ClaimDocument::load(&path) {
            Err(ClaimError::StoreCorrupt(msg)) => assert!(msg.contains("chains.json")),
            other => panic!("expected StoreCorrupt, got {:?}", other),
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = ClaimDocument::from_json("{\"version\": 9, \"chains\": []}").unwrap_err();
        assert!(matches!(err, ClaimError::StoreCorrupt(_)));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"[{"chain_id":"chain-1","agent_id":"x","files":[],
            "claimed_at":"2026-01-01T00:00:00Z","ttl_seconds":5,"status":"expired"}]"#;
        assert!(matches!(
            ClaimDocument::from_json(json),
            Err(ClaimError::StoreCorrupt(_))
        ));
    }
}
