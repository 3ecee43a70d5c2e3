//! engine
//!
//! The measurement pipeline: Resolve -> Build -> Strip -> Measure, run for
//! many revisions at once.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator ──┬── resolve(rev) ── WorkspaceBuilder::build(commit) ── Measurement
//!                ├── resolve(rev) ── WorkspaceBuilder::build(commit) ── Measurement
//!                └── ...
//! ```
//!
//! - [`resolve`] turns a revision reference into a commit id through the
//!   toolchain's VCS capability. It only reads the source repository.
//! - [`WorkspaceBuilder`] owns the per-commit steps inside a scoped
//!   [`Workspace`].
//! - [`Orchestrator`] bounds concurrency and reassembles results in input
//!   order.
//!
//! # Invariants
//!
//! - One [`Measurement`] per requested revision, in request order
//! - Each revision is resolved once, before any build work for it
//! - No workspace outlives the build that created it
//! - A failing revision never affects its siblings
//!
//! # Example
//!
//! ```ignore
//! use revsize::engine::{Orchestrator, WorkspaceBuilder};
//!
//! let builder = WorkspaceBuilder::new(toolchain);
//! let measurements = Orchestrator::new(builder)
//!     .with_jobs(4)
//!     .measure_all_blocking(&repo, &revisions)?;
//! ```

pub mod builder;
pub mod measurement;
pub mod orchestrator;
pub mod resolve;
pub mod workspace;

pub use builder::WorkspaceBuilder;
pub use measurement::{MeasureError, Measurement, Sample};
pub use orchestrator::{default_jobs, Orchestrator};
pub use resolve::resolve;
pub use workspace::{live_workspaces, remove_live_workspaces, Workspace, WORKSPACE_PREFIX};
