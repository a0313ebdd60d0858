//! Cross-process tests: separate `claimchain` processes sharing one state
//! directory must see a single serialized claim history.
//!
//! Uses `env!("CARGO_BIN_EXE_claimchain")`, set by Cargo for integration
//! tests of crates with a `[[bin]]` target.

use claimchain::chain::ClaimChain;
use claimchain::store::ClaimDocument;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

const AGENTS: usize = 10;

fn claimchain_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_claimchain"))
}

/// Base command with a hermetic environment pointed at `state_dir`.
fn command(state_dir: &Path) -> Command {
    let mut cmd = Command::new(claimchain_bin());
    cmd.arg("--state-dir")
        .arg(state_dir)
        .env_remove("CLAIMCHAIN_DIR")
        .env("CLAIMCHAIN_LOG", "off");
    cmd
}

fn run(state_dir: &Path, args: &[&str]) -> Output {
    command(state_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run claimchain {:?}: {}", args, e))
}

fn spawn_claim(state_dir: &Path, agent: &str, files: &[&str]) -> Child {
    command(state_dir)
        .args(["claim", "--agent", agent, "--ttl", "600", "--json"])
        .args(files)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn claimchain")
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("process exited by signal")
}

#[test]
fn concurrent_processes_never_hold_overlapping_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state_dir = temp_dir.path().join(".claims");
    assert_eq!(exit_code(&run(&state_dir, &["init"])), 0);

    let pool = ["src/a.rs", "src/b.rs", "src/c.rs"];
    let requests: Vec<(String, Vec<&str>)> = (0..AGENTS)
        .map(|i| {
            let files = if i % 2 == 0 {
                vec![pool[i % 3]]
            } else {
                vec![pool[i % 3], pool[(i + 1) % 3]]
            };
            (format!("agent-{}", i), files)
        })
        .collect();

    let children: Vec<Child> = requests
        .iter()
        .map(|(agent, files)| spawn_claim(&state_dir, agent, files))
        .collect();
    let outputs: Vec<Output> = children
        .into_iter()
        .map(|child| child.wait_with_output().expect("wait for claimchain"))
        .collect();

    let mut winners: Vec<ClaimChain> = Vec::new();
    let mut losers: Vec<BTreeSet<String>> = Vec::new();
    for ((agent, files), output) in requests.iter().zip(&outputs) {
        let stdout: Value = serde_json::from_slice(&output.stdout)
            .unwrap_or_else(|e| panic!("{} printed invalid JSON: {}", agent, e));
        match exit_code(output) {
            0 => {
                assert_eq!(stdout["claimed"], true);
                winners.push(serde_json::from_value(stdout["chain"].clone()).unwrap());
            }
            2 => {
                assert_eq!(stdout["claimed"], false);
                losers.push(files.iter().map(|f| f.to_string()).collect());
            }
            code => panic!(
                "{} exited with {}: {}",
                agent,
                code,
                String::from_utf8_lossy(&output.stderr)
            ),
        }
    }

    assert!(!winners.is_empty());
    for (i, a) in winners.iter().enumerate() {
        for b in winners.iter().skip(i + 1) {
            assert!(a.files.is_disjoint(&b.files));
        }
    }

    let held: BTreeSet<String> = winners.iter().flat_map(|c| c.files.clone()).collect();
    for request in &losers {
        assert!(!request.is_disjoint(&held));
    }

    let listed = run(&state_dir, &["list", "--json"]);
    assert_eq!(exit_code(&listed), 0);
    let active: Vec<ClaimChain> = serde_json::from_slice(&listed.stdout).unwrap();
    assert_eq!(active.len(), winners.len());

    let document = ClaimDocument::load(&state_dir.join("chains.json")).unwrap();
    assert_eq!(document.chains.len(), winners.len());
}

#[test]
fn cli_reports_blocked_claims_and_ownership() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state_dir = temp_dir.path().join(".claims");

    let claimed = run(&state_dir, &["claim", "--agent", "X", "--json", "f1", "f2"]);
    assert_eq!(exit_code(&claimed), 0);
    let stdout: Value = serde_json::from_slice(&claimed.stdout).unwrap();
    let chain_id = stdout["chain"]["chain_id"].as_str().unwrap().to_string();

    let blocked = run(&state_dir, &["claim", "--agent", "Y", "f2", "f3"]);
    assert_eq!(exit_code(&blocked), 2);
    let stderr = String::from_utf8_lossy(&blocked.stderr);
    assert!(stderr.contains(&chain_id), "stderr: {}", stderr);
    assert!(stderr.contains("f2"));

    let refused = run(&state_dir, &["release", &chain_id, "--agent", "Y"]);
    assert_eq!(exit_code(&refused), 1);

    let lookup = run(&state_dir, &["lookup", "f1", "--json"]);
    let holder: Value = serde_json::from_slice(&lookup.stdout).unwrap();
    assert_eq!(holder["chain_id"], chain_id.as_str());

    let released = run(&state_dir, &["release", &chain_id, "--agent", "X"]);
    assert_eq!(exit_code(&released), 0);

    assert_eq!(
        exit_code(&run(&state_dir, &["claim", "--agent", "Y", "f2", "f3"])),
        0
    );

    let events = run(&state_dir, &["events", "--json"]);
    let actions: Vec<String> = String::from_utf8_lossy(&events.stdout)
        .lines()
        .map(|line| {
            let event: Value = serde_json::from_str(line).unwrap();
            event["action"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(actions, vec!["claim", "blocked", "release", "claim"]);
}

#[test]
fn invalid_input_exits_with_user_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state_dir = temp_dir.path().join(".claims");

    let output = run(&state_dir, &["claim", "--agent", "X", "--ttl", "0", "f1"]);
    assert_eq!(exit_code(&output), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("ttl_seconds"));
    assert!(!state_dir.join("chains.json").exists());
}
