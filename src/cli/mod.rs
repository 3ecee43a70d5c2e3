//! cli
//!
//! Command-line interface layer for revsize.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Set up logging for the chosen verbosity
//! - Delegate to command handlers
//! - Map the outcome to an exit status
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Every revision was measured |
//! | 1    | At least one revision failed, or setup failed |
//! | 2    | Invalid arguments (reported by clap) |
//! | 130  | Interrupted |

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::process::ExitCode;

use crate::ui::output::Verbosity;
use anyhow::Result;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every revision was measured
    Success,
    /// Some revisions could not be measured; the rest were reported
    PartialFailure,
}

impl RunStatus {
    /// Process exit code for this status.
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::PartialFailure => ExitCode::FAILURE,
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<RunStatus> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.log_filter()),
    )
    .init();

    commands::dispatch(&cli, verbosity)
}
