//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2`. The rest of the crate reaches Git through the
//! [`Vcs`](crate::toolchain::Vcs) capability, implemented here by [`GitVcs`].
//!
//! # Responsibilities
//!
//! - Repository discovery (locating the repository root)
//! - Resolving revisions to commit ids, restricted to commit objects
//! - Cloning a repository into a build workspace
//! - Detached checkout of a commit
//!
//! # Invariants
//!
//! - Resolution only reads repository metadata
//! - Clones never share files with their source
//! - All operations return strong types (Oid)
//!
//! # Example
//!
//! ```ignore
//! use revsize::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let oid = git.resolve_commit("main")?;
//!
//! let copy = Git::clone_from(git.work_dir()?, Path::new("/tmp/ws/src"))?;
//! copy.checkout_detached(&oid)?;
//! ```

mod interface;
mod vcs;

pub use interface::{Git, GitError};
pub use vcs::GitVcs;
