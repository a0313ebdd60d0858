//! State directory resolution for claimchain.
//!
//! Every participating process must agree on one state directory; all paths
//! the store and CLI touch are derived from it here.
//!
//! Resolution order:
//! 1. An explicit directory (the CLI's `--state-dir`)
//! 2. The `CLAIMCHAIN_DIR` environment variable
//! 3. `.claims/` under the current working directory

use crate::error::{ClaimError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the shared state directory.
pub const STATE_DIR_ENV: &str = "CLAIMCHAIN_DIR";

/// Default state directory name, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".claims";

/// File name of the shared claim document.
pub const DOCUMENT_FILE: &str = "chains.json";

/// File name of the lock control file.
pub const LOCK_FILE: &str = "chains.lock";

/// File name of the optional configuration.
pub const CONFIG_FILE: &str = "config.yaml";

/// File name of the audit event log.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Resolved paths for a claim state directory. All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimContext {
    pub state_dir: PathBuf,
}

impl ClaimContext {
    /// Resolve the state directory using the standard precedence.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ClaimError::Io(format!("failed to get current working directory: {}", e))
        })?;

        let from_env = env::var_os(STATE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let dir = match (explicit, from_env) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => dir,
            (None, None) => PathBuf::from(DEFAULT_STATE_DIR),
        };

        Ok(Self::resolve_from(&cwd, dir))
    }

    /// Resolve `dir` against `base` without consulting the environment.
    pub fn resolve_from<P: AsRef<Path>, Q: AsRef<Path>>(base: P, dir: Q) -> Self {
        let dir = dir.as_ref();
        let state_dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.as_ref().join(dir)
        };
        Self { state_dir }
    }

    /// Context for an existing directory, used by tests and embedders.
    pub fn at<P: Into<PathBuf>>(state_dir: P) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.state_dir.join(DOCUMENT_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.state_dir.join(CONFIG_FILE)
    }

    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join(EVENTS_FILE)
    }

    /// Whether `init` has been run (config file present).
    pub fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    /// Create the state directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).map_err(|e| {
            ClaimError::Io(format!(
                "failed to create state directory '{}': {}",
                self.state_dir.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct EnvGuard {
        previous: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn set(value: Option<&Path>) -> Self {
            let previous = env::var_os(STATE_DIR_ENV);
            // SAFETY: tests touching the environment are #[serial].
            unsafe {
                match value {
                    Some(v) => env::set_var(STATE_DIR_ENV, v),
                    None => env::remove_var(STATE_DIR_ENV),
                }
            }
            Self { previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see EnvGuard::set.
            unsafe {
                match &self.previous {
                    Some(v) => env::set_var(STATE_DIR_ENV, v),
                    None => env::remove_var(STATE_DIR_ENV),
                }
            }
        }
    }

    #[test]
    fn test_paths_derive_from_state_dir() {
        let ctx = ClaimContext::at("/shared/.claims");

        assert_eq!(ctx.document_path(), Path::new("/shared/.claims/chains.json"));
        assert_eq!(ctx.lock_path(), Path::new("/shared/.claims/chains.lock"));
        assert_eq!(ctx.config_path(), Path::new("/shared/.claims/config.yaml"));
        assert_eq!(ctx.events_path(), Path::new("/shared/.claims/events.ndjson"));
    }

    #[test]
    fn test_resolve_from_relative_and_absolute() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = ClaimContext::resolve_from(temp_dir.path(), ".claims");
        assert_eq!(ctx.state_dir, temp_dir.path().join(".claims"));

        let absolute = temp_dir.path().join("elsewhere");
        let ctx = ClaimContext::resolve_from("/ignored", &absolute);
        assert_eq!(ctx.state_dir, absolute);
    }

    #[test]
    #[serial]
    fn test_explicit_dir_wins_over_env() {
        let temp_dir = TempDir::new().unwrap();
        let from_env = temp_dir.path().join("env");
        let explicit = temp_dir.path().join("explicit");
        let _guard = EnvGuard::set(Some(&from_env));

        let ctx = ClaimContext::resolve(Some(&explicit)).unwrap();
        assert_eq!(ctx.state_dir, explicit);
    }

    #[test]
    #[serial]
    fn test_env_dir_used_when_no_explicit() {
        let temp_dir = TempDir::new().unwrap();
        let from_env = temp_dir.path().join("env");
        let _guard = EnvGuard::set(Some(&from_env));

        let ctx = ClaimContext::resolve(None).unwrap();
        assert_eq!(ctx.state_dir, from_env);
    }

    #[test]
    #[serial]
    fn test_default_dir_under_cwd() {
        let _guard = EnvGuard::set(None);

        let ctx = ClaimContext::resolve(None).unwrap();
        assert_eq!(
            ctx.state_dir,
            env::current_dir().unwrap().join(DEFAULT_STATE_DIR)
        );
    }

    #[test]
    fn test_ensure_dir_and_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ClaimContext::at(temp_dir.path().join("state"));

        assert!(!ctx.is_initialized());
        ctx.ensure_dir().unwrap();
        assert!(ctx.state_dir.is_dir());

        std::fs::write(ctx.config_path(), "").unwrap();
        assert!(ctx.is_initialized());
    }
}
