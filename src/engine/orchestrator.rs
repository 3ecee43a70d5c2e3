//! engine::orchestrator
//!
//! Fan-out/fan-in over the requested revisions.
//!
//! # Concurrency
//!
//! Every revision gets its own tokio task as soon as `measure_all` starts. A
//! semaphore sized to the job count decides how many of them may run their
//! pipeline at once; the rest wait for a permit. The pipeline itself is
//! blocking (subprocesses and libgit2), so it runs on tokio's blocking pool.
//!
//! Results are gathered by awaiting the join handles in submission order,
//! which is what keeps output order equal to input order no matter which
//! build finishes first.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;

use super::{resolve, MeasureError, Measurement, Sample, WorkspaceBuilder};
use crate::core::types::RevisionRef;

/// Measures many revisions concurrently.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    builder: Arc<WorkspaceBuilder>,
    jobs: usize,
}

impl Orchestrator {
    /// Create an orchestrator running up to one build per available CPU.
    pub fn new(builder: WorkspaceBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
            jobs: default_jobs(),
        }
    }

    /// Limit the number of builds running at once. Zero is treated as one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Maximum number of concurrent builds.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Measure every revision, returning one [`Measurement`] per input in
    /// input order.
    ///
    /// A failure in one revision (including a panicking worker) only affects
    /// that revision's slot.
    pub async fn measure_all(&self, repo: &Path, revisions: &[RevisionRef]) -> Vec<Measurement> {
        let permits = Arc::new(Semaphore::new(self.jobs));
        log::debug!(
            "measuring {} revision(s) with up to {} job(s)",
            revisions.len(),
            self.jobs
        );

        let handles: Vec<_> = revisions
            .iter()
            .cloned()
            .map(|revision| {
                let permits = Arc::clone(&permits);
                let builder = Arc::clone(&self.builder);
                let repo = repo.to_path_buf();
                tokio::spawn(async move {
                    // The semaphore is never closed; a missing permit only
                    // means running unbounded.
                    let _permit = permits.acquire_owned().await.ok();
                    tokio::task::spawn_blocking(move || measure_one(&builder, &repo, revision))
                        .await
                })
            })
            .collect();

        let mut measurements = Vec::with_capacity(handles.len());
        for (handle, revision) in handles.into_iter().zip(revisions) {
            let measurement = match handle.await {
                Ok(Ok(measurement)) => measurement,
                Ok(Err(e)) | Err(e) => {
                    log::warn!("{}: worker failed: {}", revision, e);
                    Measurement {
                        revision: revision.clone(),
                        outcome: Err(MeasureError::TaskFailed {
                            message: e.to_string(),
                        }),
                    }
                }
            };
            measurements.push(measurement);
        }
        measurements
    }

    /// Run [`measure_all`](Self::measure_all) on a dedicated multi-threaded
    /// runtime.
    pub fn measure_all_blocking(
        &self,
        repo: &Path,
        revisions: &[RevisionRef],
    ) -> std::io::Result<Vec<Measurement>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.measure_all(repo, revisions)))
    }
}

/// Host parallelism, or one if it cannot be determined.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn measure_one(builder: &WorkspaceBuilder, repo: &Path, revision: RevisionRef) -> Measurement {
    let outcome = resolve(&*builder.toolchain().vcs, repo, &revision).and_then(|commit| {
        builder
            .build(repo, &commit)
            .map(|bytes| Sample { commit, bytes })
    });

    if let Err(e) = &outcome {
        log::debug!("{}: {}", revision, e);
    }
    Measurement { revision, outcome }
}
