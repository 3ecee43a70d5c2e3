//! Integration tests for the revsize binary.
//!
//! These run the compiled binary with an isolated HOME and config
//! locations so no user configuration leaks into the results.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// An isolated environment: a throwaway HOME plus an optional git repo.
struct Env {
    home: TempDir,
    repo: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            repo: TempDir::new().unwrap(),
        }
    }

    /// Same as [`Env::new`], with an initialized repository holding one commit.
    fn with_repo() -> Self {
        let env = Self::new();
        let dir = env.repo.path();
        run_git(dir, &["init", "-b", "main"]);
        run_git(dir, &["config", "user.email", "test@example.com"]);
        run_git(dir, &["config", "user.name", "Test User"]);
        run_git(dir, &["config", "commit.gpgsign", "false"]);
        std::fs::write(dir.join("README.md"), "# Test\n").unwrap();
        run_git(dir, &["add", "."]);
        run_git(dir, &["commit", "-m", "Initial commit"]);
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("revsize").unwrap();
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("REVSIZE_CONFIG", self.home.path().join("none.toml"))
            .env_remove("RUST_LOG")
            .arg("--cwd")
            .arg(self.repo.path());
        cmd
    }

    fn write_repo_config(&self, contents: &str) {
        let dir = self.repo.path().join(".git/revsize");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

// =============================================================================
// Argument handling
// =============================================================================

#[test]
fn help_lists_units() {
    Command::cargo_bin("revsize")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("byte"))
        .stdout(predicate::str::contains("kib"))
        .stdout(predicate::str::contains("mib"));
}

#[test]
fn invalid_unit_is_rejected_before_any_work() {
    let env = Env::new();
    env.cmd()
        .args(["--unit", "gb", "HEAD"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("gb"));
}

#[test]
fn revisions_are_required() {
    Command::cargo_bin("revsize")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("REVS"));
}

#[test]
fn zero_jobs_is_rejected() {
    let env = Env::new();
    env.cmd().args(["-j", "0", "HEAD"]).assert().code(2);
}

#[test]
fn completions_for_bash() {
    Command::cargo_bin("revsize")
        .unwrap()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("revsize"));
}

// =============================================================================
// Setup errors
// =============================================================================

#[test]
fn outside_a_repository_exits_1() {
    let env = Env::new();
    env.cmd()
        .arg("HEAD")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn invalid_repo_config_exits_1() {
    let env = Env::with_repo();
    env.write_repo_config("jobs = 0\n");

    env.cmd()
        .arg("HEAD")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("jobs"));
}

#[test]
fn unknown_config_key_exits_1() {
    let env = Env::with_repo();
    env.write_repo_config("colour = \"blue\"\n");

    env.cmd()
        .arg("HEAD")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

// =============================================================================
// Per-revision failures
// =============================================================================

#[test]
fn unknown_revision_exits_1_without_placeholder() {
    let env = Env::with_repo();
    env.cmd()
        .arg("does-not-exist")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does-not-exist"))
        .stderr(predicate::str::contains("unknown revision"));
}

#[test]
fn unknown_revision_in_json() {
    let env = Env::with_repo();
    let output = env
        .cmd()
        .args(["--format", "json", "does-not-exist"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["revision"], "does-not-exist");
    assert_eq!(value[0]["error"], "unresolvable-revision");
}

#[test]
fn deprecated_config_location_warns() {
    let env = Env::with_repo();
    std::fs::write(env.repo.path().join(".revsize.toml"), "unit = \"kib\"\n").unwrap();

    env.cmd()
        .arg("does-not-exist")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("deprecated config location"));
}

// =============================================================================
// Real builds (needs cargo and strip on PATH)
// =============================================================================

#[test]
#[ignore = "runs real cargo builds"]
fn measures_a_real_crate_at_two_revisions() {
    let env = Env::with_repo();
    let dir = env.repo.path();
    std::fs::write(
        dir.join("Cargo.toml"),
        "[package]\nname = \"hello\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(dir.join("src/main.rs"), "fn main() { println!(\"hi\"); }\n").unwrap();
    std::fs::write(dir.join(".gitignore"), "target\n").unwrap();
    run_git(dir, &["add", "."]);
    run_git(dir, &["commit", "-m", "hello"]);
    run_git(dir, &["tag", "v1"]);

    let output = env.cmd().args(["v1", "HEAD"]).output().unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    let sizes: Vec<u64> = stdout.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[0], sizes[1]);
    assert!(sizes[0] > 0);
    assert!(!dir.join("target").exists());
}
