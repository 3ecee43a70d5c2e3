//! engine::builder
//!
//! The workspace builder: one commit in, one stripped artifact size out.
//!
//! # Steps
//!
//! 1. Create a [`Workspace`]
//! 2. Clone the source repository into it
//! 3. Check out the commit
//! 4. Release build, then ask the build tool where the artifact is
//! 5. Strip the artifact in place
//! 6. Stat the artifact
//!
//! The workspace is dropped when [`WorkspaceBuilder::build`] returns, on
//! every path. Each step maps its failure to its own [`MeasureError`]
//! variant.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{MeasureError, Workspace};
use crate::core::types::Oid;
use crate::toolchain::{ToolError, Toolchain};

/// Builds commits in isolated workspaces and measures their artifact.
#[derive(Debug, Clone)]
pub struct WorkspaceBuilder {
    toolchain: Toolchain,
    temp_root: Option<PathBuf>,
}

impl WorkspaceBuilder {
    /// Create a builder using `toolchain`, with workspaces in the system
    /// temp directory.
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            temp_root: None,
        }
    }

    /// Create workspaces under `root` instead of the system temp directory.
    pub fn with_temp_root(mut self, root: Option<PathBuf>) -> Self {
        self.temp_root = root;
        self
    }

    /// The toolchain this builder drives.
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Build `commit` from the repository at `repo` and return the size in
    /// bytes of its stripped release artifact.
    pub fn build(&self, repo: &Path, commit: &Oid) -> Result<u64, MeasureError> {
        let workspace = Workspace::create(self.temp_root.as_deref()).map_err(|e| {
            MeasureError::WorkspaceFailure {
                message: format!("cannot create temporary directory: {}", e),
            }
        })?;
        let project = workspace.project_dir();
        let short = commit.short(12);

        log::debug!("{}: cloning into {}", short, project.display());
        self.toolchain
            .vcs
            .clone_repo(repo, &project)
            .map_err(|e| MeasureError::WorkspaceFailure {
                message: e.to_string(),
            })?;

        log::debug!("{}: checking out", short);
        self.toolchain
            .vcs
            .checkout(&project, commit)
            .map_err(|e| MeasureError::CheckoutFailure {
                commit: commit.clone(),
                message: e.to_string(),
            })?;

        log::info!("{}: building release artifact", short);
        self.toolchain
            .build
            .release_build(&project)
            .map_err(|e| build_failure(commit, e))?;

        let artifact = self
            .toolchain
            .build
            .artifact_path(&project)
            .map_err(|e| build_failure(commit, e))?;

        if !artifact.exists() {
            return Err(MeasureError::ArtifactMissing { path: artifact });
        }

        log::debug!("{}: stripping {}", short, artifact.display());
        self.toolchain
            .strip
            .strip(&artifact)
            .map_err(|e| MeasureError::StripFailure {
                path: artifact.clone(),
                message: match e.diagnostics() {
                    Some(stderr) => format!("{}: {}", e, stderr.trim()),
                    None => e.to_string(),
                },
            })?;

        let bytes = fs::metadata(&artifact)
            .map_err(|e| {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("cannot stat {}: {}", artifact.display(), e);
                }
                MeasureError::ArtifactMissing {
                    path: artifact.clone(),
                }
            })?
            .len();

        log::info!("{}: {} bytes", short, bytes);
        Ok(bytes)
    }
}

fn build_failure(commit: &Oid, err: ToolError) -> MeasureError {
    MeasureError::BuildFailure {
        commit: commit.clone(),
        message: err.to_string(),
        diagnostics: err.diagnostics().unwrap_or_default().to_string(),
    }
}
