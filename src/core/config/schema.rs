//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$REVSIZE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/revsize/config.toml`
//! 3. `~/.revsize/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/revsize/config.toml` (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., `unit` must name a known unit).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::units::Unit;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// unit = "kib"
/// jobs = 4
/// cargo = "cargo"
/// strip = "llvm-strip"
/// temp_dir = "/var/tmp"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default reporting unit
    pub unit: Option<String>,

    /// Maximum number of concurrent builds
    pub jobs: Option<usize>,

    /// Build tool program
    pub cargo: Option<String>,

    /// Symbol-stripping program
    pub strip: Option<String>,

    /// Directory under which build workspaces are created
    pub temp_dir: Option<PathBuf>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_unit(self.unit.as_deref())?;
        validate_jobs(self.jobs)?;
        validate_program("cargo", self.cargo.as_deref())?;
        validate_program("strip", self.strip.as_deref())?;
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// artifact = "mytool"
/// build_args = ["--features", "vendored"]
/// unit = "kib"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Binary target whose size is measured
    pub artifact: Option<String>,

    /// Extra arguments passed to the release build
    pub build_args: Option<Vec<String>>,

    /// Reporting unit for this repository
    pub unit: Option<String>,

    /// Maximum number of concurrent builds for this repository
    pub jobs: Option<usize>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(artifact) = &self.artifact {
            if artifact.is_empty() || artifact.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid artifact name '{}'",
                    artifact
                )));
            }
        }
        validate_unit(self.unit.as_deref())?;
        validate_jobs(self.jobs)?;
        Ok(())
    }
}

fn validate_unit(unit: Option<&str>) -> Result<(), ConfigError> {
    if let Some(unit) = unit {
        unit.parse::<Unit>()
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
    }
    Ok(())
}

fn validate_jobs(jobs: Option<usize>) -> Result<(), ConfigError> {
    if jobs == Some(0) {
        return Err(ConfigError::InvalidValue(
            "jobs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_program(key: &str, program: Option<&str>) -> Result<(), ConfigError> {
    if program.is_some_and(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
    }
    Ok(())
}
