//! git::vcs
//!
//! The [`Vcs`] capability backed by [`Git`].

use std::path::{Path, PathBuf};

use super::Git;
use crate::core::types::{Oid, RevisionRef};
use crate::toolchain::{ToolError, Vcs};

/// Version control through libgit2.
///
/// Stateless: every call opens its own repository handle, so one `GitVcs`
/// can serve any number of concurrent measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitVcs;

impl Vcs for GitVcs {
    fn repo_root(&self, path: &Path) -> Result<PathBuf, ToolError> {
        Ok(Git::open(path)?.work_dir()?.to_path_buf())
    }

    fn resolve_commit(&self, repo: &Path, revision: &RevisionRef) -> Result<Oid, ToolError> {
        Ok(Git::open(repo)?.resolve_commit(revision.as_str())?)
    }

    fn clone_repo(&self, source: &Path, dest: &Path) -> Result<(), ToolError> {
        Git::clone_from(source, dest)?;
        Ok(())
    }

    fn checkout(&self, worktree: &Path, commit: &Oid) -> Result<(), ToolError> {
        Ok(Git::open(worktree)?.checkout_detached(commit)?)
    }
}
