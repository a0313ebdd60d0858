//! Path canonicalization for claimed resources.
//!
//! Canonicalization is purely lexical: claimed paths need not exist, and two
//! agents on different platforms must agree on the canonical form without
//! touching the filesystem.

use crate::error::{ClaimError, Result};
use std::collections::BTreeSet;

/// Canonicalize a single resource path.
///
/// Rules:
/// - `\` is treated as `/`
/// - repeated separators collapse, `.` segments are dropped
/// - `..` cancels the preceding segment; leading `..` on a relative path is kept
/// - trailing separators are stripped
/// - a leading `/` marks an absolute path and is kept
/// - case is preserved
///
/// A path that is empty after trimming whitespace is rejected.
pub fn canonicalize_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClaimError::InvalidInput(
            "file paths must not be empty".to_string(),
        ));
    }

    let unified = trimmed.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // Cannot climb above the root of an absolute path.
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    Ok(match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    })
}

/// Canonicalize a collection of paths into a deduplicated, ordered set.
pub fn canonicalize_files<I, S>(files: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    files
        .into_iter()
        .map(|file| canonicalize_path(file.as_ref()))
        .collect()
}
