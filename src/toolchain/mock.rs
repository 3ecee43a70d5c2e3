//! toolchain::mock
//!
//! In-memory toolchain for deterministic testing.
//!
//! # Design
//!
//! [`FakeToolchain`] implements all three capability traits without running
//! any external program. Revisions map to commits and commits map to
//! artifact sizes. Every step can be configured to fail for a given commit,
//! and builds can be delayed to shuffle completion order.
//!
//! The fake still touches the filesystem the way the real tools do: clone
//! creates the destination directory, checkout records the commit in it,
//! and the build writes an artifact file of the configured size. That keeps
//! workspace cleanup and artifact measurement observable in tests.
//!
//! # Example
//!
//! ```
//! use revsize::toolchain::mock::FakeToolchain;
//! use revsize::toolchain::Vcs;
//! use revsize::core::types::RevisionRef;
//! use std::path::Path;
//!
//! let fake = FakeToolchain::new();
//! let commit = fake.add_revision("v1.0", 204_800);
//!
//! let rev = RevisionRef::new("v1.0").unwrap();
//! assert_eq!(fake.resolve_commit(Path::new("/repo"), &rev).unwrap(), commit);
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{BuildTool, Stripper, ToolError, Toolchain, Vcs};
use crate::core::types::{Oid, RevisionRef};
use crate::git::GitError;

/// File the fake checkout writes the commit id into.
const COMMIT_MARKER: &str = ".fake-commit";

/// Pipeline step a fake failure is injected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// Checking out the commit
    Checkout,
    /// Running the release build
    Build,
    /// Build succeeds but writes no artifact
    MissingArtifact,
    /// Stripping the artifact
    Strip,
}

/// Fake toolchain for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeToolchain {
    inner: Arc<Mutex<FakeInner>>,
}

#[derive(Debug, Default)]
struct FakeInner {
    revisions: HashMap<String, Oid>,
    sizes: HashMap<Oid, u64>,
    failures: HashMap<Oid, FailAt>,
    delays: HashMap<Oid, Duration>,
    fail_clones: bool,
    resolve_calls: Vec<String>,
    clones: Vec<PathBuf>,
    next_commit: u64,
}

impl FakeToolchain {
    /// Create an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a revision whose artifact is `bytes` long after stripping.
    ///
    /// Returns the commit the revision resolves to. Each call creates a new
    /// commit.
    pub fn add_revision(&self, revision: &str, bytes: u64) -> Oid {
        let mut inner = self.lock();
        inner.next_commit += 1;
        let commit = fake_oid(inner.next_commit);
        inner.revisions.insert(revision.to_string(), commit.clone());
        inner.sizes.insert(commit.clone(), bytes);
        commit
    }

    /// Make another revision name resolve to an existing commit.
    pub fn alias(&self, revision: &str, commit: &Oid) {
        self.lock()
            .revisions
            .insert(revision.to_string(), commit.clone());
    }

    /// Make the pipeline fail at `step` for `commit`.
    pub fn fail_at(&self, commit: &Oid, step: FailAt) {
        self.lock().failures.insert(commit.clone(), step);
    }

    /// Make every clone fail.
    ///
    /// Clone happens before the commit is known inside the workspace, so
    /// this failure cannot be keyed by commit.
    pub fn fail_clones(&self) {
        self.lock().fail_clones = true;
    }

    /// Delay the build of `commit` by `delay`.
    pub fn delay(&self, commit: &Oid, delay: Duration) {
        self.lock().delays.insert(commit.clone(), delay);
    }

    /// Revisions passed to `resolve_commit`, in call order.
    pub fn resolve_calls(&self) -> Vec<String> {
        self.lock().resolve_calls.clone()
    }

    /// Clone destinations, in call order.
    pub fn clones(&self) -> Vec<PathBuf> {
        self.lock().clones.clone()
    }

    /// Use this fake for every capability of a toolchain.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(self.clone(), self.clone(), self.clone())
    }

    fn failure(&self, commit: &Oid) -> Option<FailAt> {
        self.lock().failures.get(commit).copied()
    }

    fn checked_out(project: &Path) -> Result<Oid, ToolError> {
        let marker = project.join(COMMIT_MARKER);
        let contents = fs::read_to_string(&marker).map_err(|e| ToolError::Io {
            context: format!("reading {}", marker.display()),
            source: e,
        })?;
        Oid::new(contents.trim()).map_err(|e| ToolError::Git(e.into()))
    }

    fn artifact(project: &Path) -> PathBuf {
        project.join("target").join("release").join("app")
    }
}

/// Build a deterministic 40-character hex id from a counter.
fn fake_oid(n: u64) -> Oid {
    Oid::new(format!("{:040x}", n)).unwrap_or_else(|_| unreachable!("40 hex digits"))
}

fn injected(program: &str, message: &str) -> ToolError {
    ToolError::Failed {
        program: program.to_string(),
        status: "exit status: 1".to_string(),
        stderr: message.to_string(),
    }
}

impl Vcs for FakeToolchain {
    fn repo_root(&self, path: &Path) -> Result<PathBuf, ToolError> {
        Ok(path.to_path_buf())
    }

    fn resolve_commit(&self, _repo: &Path, revision: &RevisionRef) -> Result<Oid, ToolError> {
        let mut inner = self.lock();
        inner.resolve_calls.push(revision.to_string());
        inner
            .revisions
            .get(revision.as_str())
            .cloned()
            .ok_or_else(|| {
                GitError::RevisionNotFound {
                    revision: revision.to_string(),
                }
                .into()
            })
    }

    fn clone_repo(&self, source: &Path, dest: &Path) -> Result<(), ToolError> {
        let fail = {
            let mut inner = self.lock();
            inner.clones.push(dest.to_path_buf());
            inner.fail_clones
        };
        if fail {
            return Err(GitError::CloneFailed {
                source_path: source.to_path_buf(),
                dest: dest.to_path_buf(),
                message: "injected clone failure".to_string(),
            }
            .into());
        }

        fs::create_dir_all(dest).map_err(|e| ToolError::Io {
            context: format!("creating {}", dest.display()),
            source: e,
        })
    }

    fn checkout(&self, worktree: &Path, commit: &Oid) -> Result<(), ToolError> {
        if self.failure(commit) == Some(FailAt::Checkout) {
            return Err(GitError::ObjectNotFound {
                oid: commit.to_string(),
            }
            .into());
        }

        fs::write(worktree.join(COMMIT_MARKER), commit.as_str()).map_err(|e| ToolError::Io {
            context: format!("checking out {}", commit),
            source: e,
        })
    }
}

impl BuildTool for FakeToolchain {
    fn release_build(&self, project: &Path) -> Result<(), ToolError> {
        let commit = Self::checked_out(project)?;

        let delay = self.lock().delays.get(&commit).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        match self.failure(&commit) {
            Some(FailAt::Build) => {
                return Err(injected(
                    "cargo",
                    "error[E0425]: cannot find value `x` in this scope",
                ))
            }
            Some(FailAt::MissingArtifact) => return Ok(()),
            _ => {}
        }

        let size = self.lock().sizes.get(&commit).copied().unwrap_or(0);
        let artifact = Self::artifact(project);
        let io_err = |e| ToolError::Io {
            context: format!("writing {}", artifact.display()),
            source: e,
        };

        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = fs::File::create(&artifact).map_err(io_err)?;
        file.set_len(size).map_err(io_err)?;
        Ok(())
    }

    fn artifact_path(&self, project: &Path) -> Result<PathBuf, ToolError> {
        Ok(Self::artifact(project))
    }
}

impl Stripper for FakeToolchain {
    fn strip(&self, artifact: &Path) -> Result<(), ToolError> {
        let project = artifact
            .ancestors()
            .nth(3)
            .ok_or_else(|| injected("strip", "artifact outside a project"))?;
        let commit = Self::checked_out(project)?;

        if self.failure(&commit) == Some(FailAt::Strip) {
            return Err(injected("strip", "Unable to recognise the format of the input file"));
        }
        Ok(())
    }
}
