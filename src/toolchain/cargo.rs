//! toolchain::cargo
//!
//! The cargo build tool adapter.
//!
//! Release builds run `cargo build --quiet --release` inside the project
//! directory. The artifact location comes from
//! `cargo metadata --format-version=1 --no-deps`, never from a hard-coded
//! `target/` path.
//!
//! Every cargo child runs with `CARGO_TARGET_DIR=<project>/target`. It
//! outranks `CARGO_BUILD_TARGET_DIR` and `build.target-dir` from any cargo
//! config, so a user-wide target directory can never make concurrent builds
//! of different commits write into the same place.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use super::process::run_captured;
use super::{BuildTool, ToolError};

const TARGET_DIR_ENV: &str = "CARGO_TARGET_DIR";

/// Build output directory of the project checked out at `project`.
fn target_dir(project: &Path) -> PathBuf {
    project.join("target")
}

/// The subset of `cargo metadata` output revsize reads.
#[derive(Debug, Deserialize)]
pub struct CargoMetadata {
    /// Directory build outputs go to
    pub target_directory: PathBuf,
    /// Root of the cargo workspace
    pub workspace_root: PathBuf,
    /// Workspace member packages
    pub packages: Vec<Package>,
}

/// A package entry from `cargo metadata`.
#[derive(Debug, Deserialize)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Absolute path to the package manifest
    pub manifest_path: PathBuf,
    /// Build targets of the package
    pub targets: Vec<Target>,
}

/// A build target entry from `cargo metadata`.
#[derive(Debug, Deserialize)]
pub struct Target {
    /// Target name
    pub name: String,
    /// Target kinds, e.g. `["bin"]` or `["lib"]`
    pub kind: Vec<String>,
}

impl Target {
    fn is_bin(&self) -> bool {
        self.kind.iter().any(|k| k == "bin")
    }
}

impl CargoMetadata {
    /// Pick the binary whose size is measured.
    ///
    /// An explicit `artifact` always wins. Otherwise the root package must
    /// have exactly one binary target, or one named like the package.
    pub fn select_binary(&self, artifact: Option<&str>) -> Result<String, String> {
        if let Some(name) = artifact {
            return Ok(name.to_string());
        }

        let root_manifest = self.workspace_root.join("Cargo.toml");
        let package = self
            .packages
            .iter()
            .find(|p| p.manifest_path == root_manifest)
            .ok_or_else(|| {
                "workspace has no root package; configure the artifact name".to_string()
            })?;

        let bins: Vec<&Target> = package.targets.iter().filter(|t| t.is_bin()).collect();
        match bins.as_slice() {
            [] => Err(format!("package '{}' has no binary target", package.name)),
            [only] => Ok(only.name.clone()),
            many => many
                .iter()
                .find(|t| t.name == package.name)
                .map(|t| t.name.clone())
                .ok_or_else(|| {
                    format!(
                        "package '{}' has several binaries ({}); configure the artifact name",
                        package.name,
                        many.iter()
                            .map(|t| t.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                }),
        }
    }

    /// Path of the release build of `binary`.
    pub fn release_path(&self, binary: &str) -> PathBuf {
        self.target_directory
            .join("release")
            .join(format!("{}{}", binary, std::env::consts::EXE_SUFFIX))
    }
}

/// Cargo adapter.
#[derive(Debug, Clone)]
pub struct Cargo {
    program: String,
    build_args: Vec<String>,
    artifact: Option<String>,
}

impl Cargo {
    /// Create an adapter invoking `program` (usually `cargo`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            build_args: Vec::new(),
            artifact: None,
        }
    }

    /// Extra arguments appended to `cargo build --release`.
    pub fn with_build_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.build_args = args.into_iter().collect();
        self
    }

    /// Measure this binary target instead of the detected one.
    pub fn with_artifact(mut self, artifact: Option<String>) -> Self {
        self.artifact = artifact;
        self
    }

    fn command(&self, project: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(project)
            .env(TARGET_DIR_ENV, target_dir(project));
        cmd
    }

    /// Query `cargo metadata` for the project.
    pub fn metadata(&self, project: &Path) -> Result<CargoMetadata, ToolError> {
        let output = run_captured(
            self.command(project)
                .args(["metadata", "--format-version=1", "--no-deps"]),
            &self.program,
        )?;

        serde_json::from_slice(&output.stdout).map_err(|e| ToolError::BadOutput {
            program: self.program.clone(),
            message: e.to_string(),
        })
    }
}

impl BuildTool for Cargo {
    fn release_build(&self, project: &Path) -> Result<(), ToolError> {
        run_captured(
            self.command(project)
                .args(["build", "--quiet", "--release"])
                .args(&self.build_args),
            &self.program,
        )?;
        Ok(())
    }

    fn artifact_path(&self, project: &Path) -> Result<PathBuf, ToolError> {
        let metadata = self.metadata(project)?;
        let binary = metadata
            .select_binary(self.artifact.as_deref())
            .map_err(|message| ToolError::BadOutput {
                program: self.program.clone(),
                message,
            })?;
        Ok(metadata.release_path(&binary))
    }
}
