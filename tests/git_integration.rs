//! Integration tests for the Git interface.
//!
//! These tests use real git repositories created via tempfile to verify
//! revision resolution and workspace cloning against actual git data.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use revsize::core::types::{Oid, RevisionRef};
use revsize::engine::resolve;
use revsize::git::{Git, GitError, GitVcs};
use revsize::toolchain::Vcs;

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit on main.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["config", "tag.gpgsign", "false"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    /// Get the path to the repository.
    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a Git interface to this repository.
    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    /// Create a file and commit it, returning the new commit OID.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        std::fs::write(self.path().join(path), content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.git().head_oid().unwrap()
    }

    /// Ask the git CLI what a revision resolves to.
    fn rev_parse(&self, rev: &str) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", rev])
            .current_dir(self.path())
            .output()
            .expect("git rev-parse failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
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

fn rev(name: &str) -> RevisionRef {
    RevisionRef::new(name).unwrap()
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn resolves_branch_to_head_commit() {
    let repo = TestRepo::new();
    let oid = repo.git().resolve_commit("main").unwrap();
    assert_eq!(oid.as_str(), repo.rev_parse("HEAD"));
}

#[test]
fn resolves_lightweight_and_annotated_tags() {
    let repo = TestRepo::new();
    let first = repo.git().head_oid().unwrap();
    run_git(repo.path(), &["tag", "v1.0"]);
    run_git(repo.path(), &["tag", "-a", "v1.0-annotated", "-m", "release"]);
    repo.commit_file("a.txt", "a", "second");

    let git = repo.git();
    assert_eq!(git.resolve_commit("v1.0").unwrap(), first);
    assert_eq!(git.resolve_commit("v1.0-annotated").unwrap(), first);
}

#[test]
fn resolves_short_hash_and_ancestry() {
    let repo = TestRepo::new();
    let first = repo.git().head_oid().unwrap();
    let second = repo.commit_file("a.txt", "a", "second");

    let git = repo.git();
    assert_eq!(git.resolve_commit(first.short(10)).unwrap(), first);
    assert_eq!(git.resolve_commit("HEAD~1").unwrap(), first);
    assert_eq!(git.resolve_commit("HEAD").unwrap(), second);
}

#[test]
fn resolution_is_deterministic() {
    let repo = TestRepo::new();
    repo.commit_file("a.txt", "a", "second");

    let a = repo.git().resolve_commit("main").unwrap();
    let b = repo.git().resolve_commit("main").unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_revision_is_not_found() {
    let repo = TestRepo::new();
    let err = repo.git().resolve_commit("does-not-exist").unwrap_err();
    assert!(
        matches!(err, GitError::RevisionNotFound { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn tree_id_does_not_resolve_to_a_commit() {
    let repo = TestRepo::new();
    let tree = repo.rev_parse("HEAD^{tree}");

    let err = repo.git().resolve_commit(&tree).unwrap_err();
    assert!(
        matches!(err, GitError::NotACommit { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn engine_resolve_reports_unresolvable_revision() {
    let repo = TestRepo::new();
    let err = resolve(&GitVcs, repo.path(), &rev("nope")).unwrap_err();
    assert_eq!(err.kind(), "unresolvable-revision");
    assert!(err.to_string().contains("unknown revision"));
}

#[test]
fn repo_root_is_found_from_subdirectory() {
    let repo = TestRepo::new();
    let nested = repo.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    let root = GitVcs.repo_root(&nested).unwrap();
    assert_eq!(
        root.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

#[test]
fn directory_outside_any_repo_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = Git::open(dir.path()).unwrap_err();
    assert!(matches!(err, GitError::NotARepo { .. }));
}

// =============================================================================
// Clone + checkout
// =============================================================================

#[test]
fn clone_and_checkout_leaves_source_untouched() {
    let repo = TestRepo::new();
    let first = repo.git().head_oid().unwrap();
    repo.commit_file("a.txt", "second", "second");
    let head_before = repo.rev_parse("HEAD");

    let workspace = TempDir::new().unwrap();
    let dest = workspace.path().join("src");
    GitVcs.clone_repo(repo.path(), &dest).unwrap();
    GitVcs.checkout(&dest, &first).unwrap();

    assert!(!dest.join("a.txt").exists());
    assert!(dest.join("README.md").exists());
    assert_eq!(Git::open(&dest).unwrap().head_oid().unwrap(), first);

    assert_eq!(repo.rev_parse("HEAD"), head_before);
    assert!(repo.path().join("a.txt").exists());
}

#[test]
fn clones_are_independent() {
    let repo = TestRepo::new();
    let first = repo.git().head_oid().unwrap();
    let second = repo.commit_file("a.txt", "a", "second");

    let workspace = TempDir::new().unwrap();
    let a = workspace.path().join("a");
    let b = workspace.path().join("b");
    GitVcs.clone_repo(repo.path(), &a).unwrap();
    GitVcs.clone_repo(repo.path(), &b).unwrap();
    GitVcs.checkout(&a, &first).unwrap();
    GitVcs.checkout(&b, &second).unwrap();

    assert!(!a.join("a.txt").exists());
    assert!(b.join("a.txt").exists());
}

#[test]
fn checkout_of_unknown_commit_fails() {
    let repo = TestRepo::new();
    let workspace = TempDir::new().unwrap();
    let dest = workspace.path().join("src");
    GitVcs.clone_repo(repo.path(), &dest).unwrap();

    let missing = Oid::new("1111111111111111111111111111111111111111").unwrap();
    assert!(GitVcs.checkout(&dest, &missing).is_err());
}
