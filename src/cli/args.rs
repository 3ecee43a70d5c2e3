//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--unit` / `-u <unit>`: Reporting unit
//! - `--jobs` / `-j <n>`: Maximum concurrent builds
//! - `--artifact <name>`: Binary target to measure
//! - `--format <plain|json>`: Output format
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--completions <shell>`: Print a completion script and exit

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::core::types::RevisionRef;
use crate::core::units::Unit;
use crate::ui::Format;

/// Measure a project's stripped release binary size at each git revision
#[derive(Parser, Debug)]
#[command(name = "revsize")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Size of two tags, in KiB
    revsize --unit kib v1.0 v1.1

    # Last five commits on main, two builds at a time
    revsize -j 2 main~4 main~3 main~2 main~1 main

    # Machine-readable output for a specific binary
    revsize --artifact mytool --format json HEAD~10 HEAD")]
pub struct Cli {
    /// Revisions to measure (branches, tags, commit hashes)
    #[arg(value_name = "REVS", required_unless_present = "completions")]
    pub revs: Vec<RevisionRef>,

    /// Unit to report sizes in [default: byte]
    #[arg(short, long, value_enum)]
    pub unit: Option<Unit>,

    /// Maximum number of concurrent builds [default: available CPUs]
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Binary target whose artifact is measured
    #[arg(long, value_name = "NAME")]
    pub artifact: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    pub format: Format,

    /// Run as if revsize was started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_revisions_in_order() {
        let cli = Cli::try_parse_from(["revsize", "-u", "kib", "v1.0", "v1.1"]).unwrap();
        let revs: Vec<_> = cli.revs.iter().map(RevisionRef::as_str).collect();
        assert_eq!(revs, vec!["v1.0", "v1.1"]);
        assert_eq!(cli.unit, Some(Unit::Kib));
        assert_eq!(cli.format, Format::Plain);
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = Cli::try_parse_from(["revsize", "--unit", "gb", "HEAD"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn requires_a_revision() {
        let err = Cli::try_parse_from(["revsize"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_empty_revision() {
        assert!(Cli::try_parse_from(["revsize", ""]).is_err());
    }

    #[test]
    fn rejects_zero_jobs() {
        assert!(Cli::try_parse_from(["revsize", "-j", "0", "HEAD"]).is_err());
        let cli = Cli::try_parse_from(["revsize", "-j", "3", "HEAD"]).unwrap();
        assert_eq!(cli.jobs, Some(3));
    }

    #[test]
    fn completions_stand_alone() {
        let cli = Cli::try_parse_from(["revsize", "--completions", "zsh"]).unwrap();
        assert_eq!(cli.completions, Some(Shell::Zsh));
        assert!(cli.revs.is_empty());
        assert!(Cli::try_parse_from(["revsize", "--completions", "zsh", "HEAD"]).is_err());
    }
}
