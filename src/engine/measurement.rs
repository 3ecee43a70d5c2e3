//! engine::measurement
//!
//! Per-revision results and the per-revision error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{Oid, RevisionRef};

/// Why a single revision could not be measured.
///
/// These errors are local to one revision: the orchestrator records them in
/// that revision's slot and keeps measuring the others.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MeasureError {
    /// The revision does not resolve to exactly one commit.
    #[error("cannot resolve revision '{revision}': {message}")]
    UnresolvableRevision {
        /// The revision as requested
        revision: String,
        /// Why resolution failed
        message: String,
    },

    /// The temporary workspace could not be created or populated.
    #[error("failed to prepare workspace: {message}")]
    WorkspaceFailure {
        /// Why the workspace could not be prepared
        message: String,
    },

    /// The resolved commit could not be checked out in the workspace.
    #[error("failed to check out {commit}: {message}")]
    CheckoutFailure {
        /// The commit being checked out
        commit: Oid,
        /// Why the checkout failed
        message: String,
    },

    /// The release build failed.
    #[error("release build of {commit} failed: {message}")]
    BuildFailure {
        /// The commit being built
        commit: Oid,
        /// Summary of the failure
        message: String,
        /// The build tool's diagnostic output
        diagnostics: String,
    },

    /// The build reported success but the artifact is not there.
    #[error("build artifact missing: {}", .path.display())]
    ArtifactMissing {
        /// Where the artifact was expected
        path: PathBuf,
    },

    /// Stripping the artifact failed.
    #[error("failed to strip {}: {message}", .path.display())]
    StripFailure {
        /// The artifact being stripped
        path: PathBuf,
        /// Why stripping failed
        message: String,
    },

    /// The worker running this measurement panicked or was lost.
    #[error("measurement task failed: {message}")]
    TaskFailed {
        /// Description of the task failure
        message: String,
    },
}

impl MeasureError {
    /// A stable, machine-readable name for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            MeasureError::UnresolvableRevision { .. } => "unresolvable-revision",
            MeasureError::WorkspaceFailure { .. } => "workspace-failure",
            MeasureError::CheckoutFailure { .. } => "checkout-failure",
            MeasureError::BuildFailure { .. } => "build-failure",
            MeasureError::ArtifactMissing { .. } => "artifact-missing",
            MeasureError::StripFailure { .. } => "strip-failure",
            MeasureError::TaskFailed { .. } => "task-failed",
        }
    }

    /// Diagnostic output from the failing tool, if any was captured.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            MeasureError::BuildFailure { diagnostics, .. } if !diagnostics.is_empty() => {
                Some(diagnostics)
            }
            _ => None,
        }
    }
}

/// A successful measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// The commit the revision resolved to
    pub commit: Oid,
    /// Size of the stripped artifact in bytes
    pub bytes: u64,
}

/// The outcome for one requested revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// The revision as requested
    pub revision: RevisionRef,
    /// The sample, or why there is none
    pub outcome: Result<Sample, MeasureError>,
}

impl Measurement {
    /// The measured size, if the measurement succeeded.
    pub fn bytes(&self) -> Option<u64> {
        self.outcome.as_ref().ok().map(|s| s.bytes)
    }

    /// Whether the measurement succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
