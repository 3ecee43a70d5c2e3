//! toolchain::traits
//!
//! Capability traits for the external tools a measurement drives.
//!
//! # Design
//!
//! Each trait is deliberately narrow: it names only the operations the
//! pipeline performs with that tool. All methods are blocking; the
//! orchestrator runs them on blocking worker threads. Implementations must
//! be `Send + Sync` because one toolchain is shared by every worker.
//!
//! # Example
//!
//! ```ignore
//! use revsize::toolchain::{Toolchain, Cargo, Strip};
//! use revsize::git::GitVcs;
//!
//! let toolchain = Toolchain::new(GitVcs, Cargo::new("cargo"), Strip::new("strip"));
//! let commit = toolchain.vcs.resolve_commit(repo, &revision)?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::core::types::{Oid, RevisionRef};
use crate::git::GitError;

/// Errors from external tool invocations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that was invoked
        program: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed {
        /// The program that was invoked
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The program succeeded but its output could not be understood.
    #[error("unexpected output from {program}: {message}")]
    BadOutput {
        /// The program that was invoked
        program: String,
        /// What was wrong with the output
        message: String,
    },

    /// A filesystem operation around the tool failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A version-control operation failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl ToolError {
    /// Diagnostic output captured from the tool, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            ToolError::Failed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Version-control capability.
pub trait Vcs: Send + Sync {
    /// Find the root of the repository containing `path`.
    fn repo_root(&self, path: &Path) -> Result<PathBuf, ToolError>;

    /// Resolve `revision` in `repo` to the full id of a commit.
    ///
    /// Must not modify `repo`.
    fn resolve_commit(&self, repo: &Path, revision: &RevisionRef) -> Result<Oid, ToolError>;

    /// Make a full, independent copy of `source` at `dest`.
    fn clone_repo(&self, source: &Path, dest: &Path) -> Result<(), ToolError>;

    /// Check out `commit` in the working tree at `worktree`.
    fn checkout(&self, worktree: &Path, commit: &Oid) -> Result<(), ToolError>;
}

/// Build tool capability.
pub trait BuildTool: Send + Sync {
    /// Run a release build of the project at `project`.
    fn release_build(&self, project: &Path) -> Result<(), ToolError>;

    /// Path of the release artifact the build in `project` produces.
    ///
    /// Derived from the build tool's own metadata, since different
    /// checkouts may configure different output locations.
    fn artifact_path(&self, project: &Path) -> Result<PathBuf, ToolError>;
}

/// Symbol-stripping capability.
pub trait Stripper: Send + Sync {
    /// Strip debug and symbol information from `artifact` in place.
    fn strip(&self, artifact: &Path) -> Result<(), ToolError>;
}

/// The set of tools one measurement run uses.
///
/// Cheap to clone; all clones share the same adapters.
#[derive(Clone)]
pub struct Toolchain {
    /// Version control
    pub vcs: Arc<dyn Vcs>,
    /// Build tool
    pub build: Arc<dyn BuildTool>,
    /// Symbol stripper
    pub strip: Arc<dyn Stripper>,
}

impl Toolchain {
    /// Bundle three adapters into a toolchain.
    pub fn new(
        vcs: impl Vcs + 'static,
        build: impl BuildTool + 'static,
        strip: impl Stripper + 'static,
    ) -> Self {
        Self {
            vcs: Arc::new(vcs),
            build: Arc::new(build),
            strip: Arc::new(strip),
        }
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}
