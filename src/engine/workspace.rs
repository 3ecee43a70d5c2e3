//! engine::workspace
//!
//! Scoped build workspaces.
//!
//! # Lifetime
//!
//! A [`Workspace`] is a uniquely named temporary directory owned by exactly
//! one build. It is removed when the value is dropped, so every exit path of
//! the build (success, `?` early return, panic unwind) releases it.
//!
//! # Interruption
//!
//! `Drop` does not run when the process is killed by a signal. Every live
//! workspace is therefore also recorded in a process-wide registry, which an
//! interrupt handler drains with [`remove_live_workspaces`] before exiting.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

/// Prefix of every workspace directory name.
pub const WORKSPACE_PREFIX: &str = "revsize-";

/// Name of the repository checkout inside a workspace.
const PROJECT_DIR: &str = "src";

static LIVE_WORKSPACES: Mutex<BTreeSet<PathBuf>> = Mutex::new(BTreeSet::new());

fn live() -> MutexGuard<'static, BTreeSet<PathBuf>> {
    LIVE_WORKSPACES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// An exclusively owned temporary directory for one build.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `root`, or the system temp directory.
    pub fn create(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let path = dir.path().to_path_buf();

        live().insert(path.clone());
        log::debug!("created workspace {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the repository is cloned inside the workspace.
    pub fn project_dir(&self) -> PathBuf {
        self.path.join(PROJECT_DIR)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        live().remove(&self.path);

        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => log::debug!("removed workspace {}", self.path.display()),
                Err(e) => log::warn!(
                    "failed to remove workspace {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

/// Paths of all workspaces currently alive in this process.
pub fn live_workspaces() -> Vec<PathBuf> {
    live().iter().cloned().collect()
}

/// Remove every live workspace from disk.
///
/// Meant for an interrupt handler that is about to exit the process.
/// Returns the number of directories removed.
pub fn remove_live_workspaces() -> usize {
    let paths: Vec<PathBuf> = std::mem::take(&mut *live()).into_iter().collect();
    paths
        .iter()
        .filter(|path| std::fs::remove_dir_all(path).is_ok())
        .count()
}
