//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! revsize. Every repository read (root discovery, revision resolution) and
//! every workspace write (clone, checkout) flows through [`Git`], which
//! normalizes git2 failures into typed [`GitError`] categories.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RevisionNotFound`]: Revision does not name anything
//! - [`GitError::AmbiguousRevision`]: Short revision matches several objects
//! - [`GitError::NotACommit`]: Revision names an object that is not a commit
//! - [`GitError::CloneFailed`] / [`GitError::CheckoutFailed`]: Workspace setup
//!
//! # Example
//!
//! ```ignore
//! use revsize::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let oid = git.resolve_commit("v1.0")?;
//! println!("v1.0 is {}", oid.short(7));
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Revision does not exist.
    #[error("unknown revision: {revision}")]
    RevisionNotFound {
        /// The revision as given
        revision: String,
    },

    /// Revision is a short prefix matching more than one object.
    #[error("ambiguous revision: {revision}")]
    AmbiguousRevision {
        /// The revision as given
        revision: String,
    },

    /// Revision exists but does not designate a commit.
    #[error("revision does not name a commit: {revision}")]
    NotACommit {
        /// The revision as given
        revision: String,
    },

    /// Revision syntax was rejected.
    #[error("invalid revision '{revision}': {message}")]
    InvalidRevision {
        /// The revision as given
        revision: String,
        /// Description from git
        message: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Cloning into a workspace failed.
    #[error("failed to clone {source_path} into {dest}: {message}")]
    CloneFailed {
        /// The repository being cloned
        source_path: PathBuf,
        /// The clone destination
        dest: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// Checking out a commit failed.
    #[error("failed to check out {oid}: {message}")]
    CheckoutFailed {
        /// The commit being checked out
        oid: String,
        /// Description of the failure
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Classify a git2 error raised while resolving `revision`.
    fn from_revparse(err: git2::Error, revision: &str) -> Self {
        let revision = revision.to_string();
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RevisionNotFound { revision },
            git2::ErrorCode::Ambiguous => GitError::AmbiguousRevision { revision },
            git2::ErrorCode::Peel => GitError::NotACommit { revision },
            git2::ErrorCode::InvalidSpec => GitError::InvalidRevision {
                revision,
                message: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", revision, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRevision(msg) => GitError::InvalidRevision {
                revision: String::new(),
                message: msg,
            },
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2` directly.
///
/// A `Git` owns a `git2::Repository`, which is `Send` but not `Sync`; every
/// concurrent measurement opens its own handle.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Get the root of the working directory.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve a revision to the full id of the commit it designates.
    ///
    /// Equivalent to `git rev-parse --verify <revision>^{commit}`: the
    /// revision is peeled to a commit, and anything that cannot be peeled
    /// to one (a tree, a blob) is rejected rather than returned. Annotated
    /// tags are peeled to the commit they point to.
    ///
    /// Only reads repository metadata.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if nothing matches
    /// - [`GitError::AmbiguousRevision`] if a short hash matches several objects
    /// - [`GitError::NotACommit`] if the object is not a commit
    pub fn resolve_commit(&self, revision: &str) -> Result<Oid, GitError> {
        let spec = format!("{}^{{commit}}", revision);
        let object = self
            .repo
            .revparse_single(&spec)
            .map_err(|e| GitError::from_revparse(e, revision))?;

        let commit = object
            .peel_to_commit()
            .map_err(|_| GitError::NotACommit {
                revision: revision.to_string(),
            })?;

        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Get the OID that HEAD points to.
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    // =========================================================================
    // Workspace Operations
    // =========================================================================

    /// Clone the repository at `source` into `dest`.
    ///
    /// The clone copies the object database instead of hard-linking it, so
    /// the new repository shares no files with `source`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CloneFailed`] if the clone cannot be completed.
    pub fn clone_from(source: &Path, dest: &Path) -> Result<Self, GitError> {
        let clone_failed = |message: String| GitError::CloneFailed {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            message,
        };

        let url = source
            .to_str()
            .ok_or_else(|| clone_failed("source path is not valid UTF-8".to_string()))?;

        let repo = git2::build::RepoBuilder::new()
            .clone_local(git2::build::CloneLocal::NoLinks)
            .clone(url, dest)
            .map_err(|e| clone_failed(e.message().to_string()))?;

        Ok(Self { repo })
    }

    /// Check out `oid` with a detached HEAD, overwriting the working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit is absent from this repository
    /// - [`GitError::CheckoutFailed`] if the working tree cannot be updated
    pub fn checkout_detached(&self, oid: &Oid) -> Result<(), GitError> {
        let id = git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
            oid: oid.to_string(),
        })?;

        let commit = self.repo.find_commit(id).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: oid.to_string(),
            },
            _ => GitError::CheckoutFailed {
                oid: oid.to_string(),
                message: e.message().to_string(),
            },
        })?;

        let checkout_failed = |e: git2::Error| GitError::CheckoutFailed {
            oid: oid.to_string(),
            message: e.message().to_string(),
        };

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.force();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut opts))
            .map_err(checkout_failed)?;
        self.repo.set_head_detached(id).map_err(checkout_failed)?;

        Ok(())
    }
}
