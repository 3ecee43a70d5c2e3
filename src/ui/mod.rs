//! ui
//!
//! Everything the user reads.
//!
//! # Modules
//!
//! - [`output`] - Warnings, errors and debug notes on stderr
//! - [`report`] - Measurement results in plain or JSON form
//!
//! # Design
//!
//! Results go to stdout and nothing else does, so the output can be piped
//! straight into other tools.

pub mod output;
pub mod report;

pub use report::{Format, ReportSummary, Reporter};
