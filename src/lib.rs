//! revsize - Track release binary size across git revisions
//!
//! revsize builds a project at each requested revision in an isolated
//! workspace, strips the release artifact and reports its size, one line per
//! revision in the order the revisions were given.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, wires the toolchain)
//! - [`engine`] - Resolve -> Build -> Strip -> Measure, concurrently per revision
//! - [`toolchain`] - Capability traits for git, cargo and strip, plus fakes
//! - [`git`] - Single interface for all Git operations
//! - [`core`] - Domain types, units and configuration
//! - [`ui`] - Reporting and user-facing messages
//!
//! # Correctness Invariants
//!
//! 1. Results come back in request order, one per requested revision
//! 2. The source repository is only ever read
//! 3. Concurrent builds never share a workspace
//! 4. Workspaces are removed on success, failure and interrupt

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod toolchain;
pub mod ui;
