//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! There is one real command, measuring revisions. `--completions`
//! short-circuits it and only prints a script.

mod completion;
mod measure;

pub use completion::completion;
pub use measure::measure;

use super::{Cli, RunStatus};
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Dispatch to the handler selected by the parsed arguments.
pub fn dispatch(cli: &Cli, verbosity: Verbosity) -> Result<RunStatus> {
    if let Some(shell) = cli.completions {
        completion(shell, &mut std::io::stdout().lock())?;
        return Ok(RunStatus::Success);
    }

    measure(cli, verbosity)
}
