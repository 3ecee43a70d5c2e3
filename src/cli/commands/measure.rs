//! measure - Build and size every requested revision
//!
//! Resolves settings (flag > repo config > global config > default), wires
//! the real toolchain together and hands the revisions to the engine.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::super::{Cli, RunStatus};
use crate::core::config::Config;
use crate::engine::{self, Orchestrator, WorkspaceBuilder};
use crate::git::GitVcs;
use crate::toolchain::{Cargo, Strip, Toolchain, Vcs};
use crate::ui::output::{self, Verbosity};
use crate::ui::Reporter;

/// Measure the revisions named on the command line.
pub fn measure(cli: &Cli, verbosity: Verbosity) -> Result<RunStatus> {
    let cwd = match &cli.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let repo = find_repo(&cwd)?;
    output::debug(format!("repository: {}", repo.display()), verbosity);

    let loaded = Config::load(Some(&repo)).context("failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    let config = loaded.config;
    if let Some(path) = config.global_config_loaded_from() {
        output::debug(format!("global config: {}", path.display()), verbosity);
    }
    if let Some(path) = config.repo_config_loaded_from() {
        output::debug(format!("repo config: {}", path.display()), verbosity);
    }

    let unit = cli.unit.unwrap_or_else(|| config.unit());
    let jobs = cli
        .jobs
        .or_else(|| config.jobs())
        .unwrap_or_else(engine::default_jobs);
    let artifact = cli
        .artifact
        .clone()
        .or_else(|| config.artifact().map(str::to_string));

    let toolchain = Toolchain::new(
        GitVcs,
        Cargo::new(config.cargo_program())
            .with_build_args(config.build_args().to_vec())
            .with_artifact(artifact),
        Strip::new(config.strip_program()),
    );
    let builder =
        WorkspaceBuilder::new(toolchain).with_temp_root(config.temp_dir().map(Path::to_path_buf));

    install_interrupt_handler(verbosity);

    output::debug(
        format!("measuring {} revision(s), {} job(s)", cli.revs.len(), jobs),
        verbosity,
    );
    let measurements = Orchestrator::new(builder)
        .with_jobs(jobs)
        .measure_all_blocking(&repo, &cli.revs)
        .context("failed to start worker runtime")?;

    let summary = Reporter::new(unit, cli.format)
        .with_verbosity(verbosity)
        .write(
            &measurements,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        )
        .context("failed to write results")?;

    if summary.all_measured() {
        Ok(RunStatus::Success)
    } else {
        output::debug(
            format!(
                "{} of {} revision(s) failed",
                summary.failed,
                measurements.len()
            ),
            verbosity,
        );
        Ok(RunStatus::PartialFailure)
    }
}

fn find_repo(cwd: &Path) -> Result<PathBuf> {
    GitVcs
        .repo_root(cwd)
        .with_context(|| format!("cannot measure from '{}'", cwd.display()))
}

/// Remove live workspaces and exit with 130 on Ctrl-C.
fn install_interrupt_handler(verbosity: Verbosity) {
    let installed = ctrlc::set_handler(|| {
        let removed = engine::remove_live_workspaces();
        log::warn!("interrupted; removed {} workspace(s)", removed);
        std::process::exit(130);
    });

    if let Err(e) = installed {
        output::warn(
            format!("cannot install interrupt handler: {}", e),
            verbosity,
        );
    }
}
