//! engine::resolve
//!
//! Revision resolution: a user-supplied revision becomes the canonical id of
//! the commit it designates.

use std::path::Path;

use super::MeasureError;
use crate::core::types::{Oid, RevisionRef};
use crate::toolchain::Vcs;

/// Resolve `revision` in the repository at `repo`.
///
/// Only reads `repo`. References that are missing, ambiguous or do not
/// designate a commit fail with [`MeasureError::UnresolvableRevision`].
pub fn resolve(vcs: &dyn Vcs, repo: &Path, revision: &RevisionRef) -> Result<Oid, MeasureError> {
    let commit = vcs
        .resolve_commit(repo, revision)
        .map_err(|e| MeasureError::UnresolvableRevision {
            revision: revision.to_string(),
            message: e.to_string(),
        })?;

    log::info!("{}: resolved to {}", revision, commit.short(12));
    Ok(commit)
}
