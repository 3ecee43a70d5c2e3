//! ui::report
//!
//! Rendering measurements for the user.
//!
//! # Formats
//!
//! - `plain`: one integer per successfully measured revision on stdout, in
//!   request order. Failed revisions print nothing on stdout.
//! - `json`: a single array on stdout with one object per requested
//!   revision, failures included.
//!
//! In both formats every failure is also reported on stderr as
//! `error: <revision>: <message>`, followed by the build tool's diagnostics
//! unless output is quiet. A failed revision never gets a placeholder size.
//! Plain output is written in one pass, so each stderr line lands where
//! the failed revision's size would have been.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use super::output::{indent, Verbosity};
use crate::core::units::Unit;
use crate::engine::Measurement;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One integer per line
    #[default]
    Plain,
    /// A JSON array of result objects
    Json,
}

/// Counts from one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    /// Revisions with a size
    pub measured: usize,
    /// Revisions that failed
    pub failed: usize,
}

impl ReportSummary {
    /// Whether every revision was measured.
    pub fn all_measured(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Measured {
        revision: &'a str,
        commit: &'a str,
        bytes: u64,
        size: u64,
        unit: Unit,
    },
    Failed {
        revision: &'a str,
        error: &'static str,
        message: String,
    },
}

/// Writes measurements in the chosen unit and format.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    unit: Unit,
    format: Format,
    verbosity: Verbosity,
}

impl Reporter {
    /// Create a reporter.
    pub fn new(unit: Unit, format: Format) -> Self {
        Self {
            unit,
            format,
            verbosity: Verbosity::Normal,
        }
    }

    /// Set how much failure detail goes to stderr.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Write `measurements` to `out`, and failure diagnostics to `err`.
    ///
    /// In plain format each revision is written at its own position in
    /// request order, so on a terminal every error sits between the sizes
    /// of its neighbours.
    pub fn write(
        &self,
        measurements: &[Measurement],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<ReportSummary> {
        let mut summary = ReportSummary::default();

        for m in measurements {
            match &m.outcome {
                Ok(sample) => {
                    summary.measured += 1;
                    if self.format == Format::Plain {
                        writeln!(out, "{}", self.unit.convert(sample.bytes))?;
                    }
                }
                Err(_) => {
                    summary.failed += 1;
                    out.flush()?;
                    self.write_failure(m, err)?;
                }
            }
        }

        if self.format == Format::Json {
            self.write_json(measurements, out)?;
        }
        out.flush()?;
        Ok(summary)
    }

    fn write_failure(&self, m: &Measurement, err: &mut impl Write) -> io::Result<()> {
        let Err(e) = &m.outcome else {
            return Ok(());
        };
        writeln!(err, "error: {}: {}", m.revision, e)?;
        if let Some(diagnostics) = e.diagnostics() {
            if self.verbosity != Verbosity::Quiet {
                writeln!(err, "{}", indent(diagnostics, "    "))?;
            }
        }
        err.flush()
    }

    fn write_json(&self, measurements: &[Measurement], out: &mut impl Write) -> io::Result<()> {
        let entries: Vec<Entry<'_>> = measurements
            .iter()
            .map(|m| match &m.outcome {
                Ok(sample) => Entry::Measured {
                    revision: m.revision.as_str(),
                    commit: sample.commit.as_str(),
                    bytes: sample.bytes,
                    size: self.unit.convert(sample.bytes),
                    unit: self.unit,
                },
                Err(e) => Entry::Failed {
                    revision: m.revision.as_str(),
                    error: e.kind(),
                    message: e.to_string(),
                },
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)
    }
}
