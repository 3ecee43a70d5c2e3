//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! revsize has two configuration scopes:
//! - **Global**: User-level settings (tool programs, default unit, jobs)
//! - **Repo**: Repository-level settings (artifact, build arguments)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REVSIZE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/revsize/config.toml`
//! 3. `~/.revsize/config.toml`
//!
//! # Repo Config Locations
//!
//! Searched in order:
//! 1. `.git/revsize/config.toml` (canonical)
//! 2. `.revsize.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use revsize::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! let config = result.config;
//!
//! println!("Unit: {}", config.unit());
//! println!("Strip: {}", config.strip_program());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::units::Unit;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo config overrides global
/// config, which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_path` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(repo_path: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path_found) = if let Some(path) = repo_path {
            Self::load_repo(path, &mut warnings)?
        } else {
            (None, None)
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path: repo_path_found,
            },
            warnings,
        })
    }

    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        if let Ok(path) = std::env::var("REVSIZE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("revsize/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".revsize/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    fn load_repo(
        repo_path: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        let canonical = Self::repo_config_path(repo_path);
        if canonical.exists() {
            let config = Self::read_toml(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        let compat_root = repo_path.join(".revsize.toml");
        if compat_root.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please move to '{}'",
                    canonical.display()
                ),
                path: compat_root.clone(),
            });
            let config = Self::read_toml(&compat_root)?;
            return Ok((Some(config), Some(compat_root)));
        }

        Ok((None, None))
    }

    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for repo config.
    ///
    /// Returns `.git/revsize/config.toml` relative to the given repo path.
    pub fn repo_config_path(repo_path: &Path) -> PathBuf {
        repo_path.join(".git/revsize/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the reporting unit.
    ///
    /// Defaults to [`Unit::Byte`]. Values are validated at load time.
    pub fn unit(&self) -> Unit {
        self.repo
            .as_ref()
            .and_then(|r| r.unit.as_deref())
            .or(self.global.unit.as_deref())
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    /// Get the configured job count, if any.
    pub fn jobs(&self) -> Option<usize> {
        self.repo
            .as_ref()
            .and_then(|r| r.jobs)
            .or(self.global.jobs)
    }

    /// Get the configured artifact name, if any.
    pub fn artifact(&self) -> Option<&str> {
        self.repo.as_ref().and_then(|r| r.artifact.as_deref())
    }

    /// Get extra release-build arguments.
    pub fn build_args(&self) -> &[String] {
        self.repo
            .as_ref()
            .and_then(|r| r.build_args.as_deref())
            .unwrap_or(&[])
    }

    /// Get the build tool program. Defaults to `cargo`.
    pub fn cargo_program(&self) -> &str {
        self.global.cargo.as_deref().unwrap_or("cargo")
    }

    /// Get the strip program. Defaults to `strip`.
    pub fn strip_program(&self) -> &str {
        self.global.strip.as_deref().unwrap_or("strip")
    }

    /// Get the directory build workspaces are created under, if configured.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.global.temp_dir.as_deref()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_repo_config() {
        let config = Config::default();

        assert_eq!(config.unit(), Unit::Byte);
        assert_eq!(config.jobs(), None);
        assert_eq!(config.artifact(), None);
        assert!(config.build_args().is_empty());
        assert_eq!(config.cargo_program(), "cargo");
        assert_eq!(config.strip_program(), "strip");
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".git/revsize");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("config.toml"),
            r#"
            artifact = "tool"
            unit = "kib"
            jobs = 3
            "#,
        )
        .unwrap();

        let result = Config::load(Some(temp.path())).unwrap();
        let config = result.config;

        assert_eq!(config.artifact(), Some("tool"));
        assert_eq!(config.unit(), Unit::Kib);
        assert_eq!(config.jobs(), Some(3));
        assert!(result.warnings.is_empty());
        assert_eq!(
            config.repo_config_loaded_from(),
            Some(Config::repo_config_path(temp.path()).as_path())
        );
    }

    #[test]
    fn load_repo_compat_warns() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".revsize.toml"), "artifact = \"tool\"").unwrap();

        let result = Config::load(Some(temp.path())).unwrap();

        assert_eq!(result.config.artifact(), Some("tool"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("deprecated"));
    }

    #[test]
    fn invalid_unit_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".git/revsize");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "unit = \"megabytes\"").unwrap();

        assert!(Config::load(Some(temp.path())).is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".git/revsize");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            r#"
            artifact = "tool"
            cache_builds = true
            "#,
        )
        .unwrap();

        let result = Config::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: GlobalConfig {
                unit: Some("mib".to_string()),
                jobs: Some(8),
                ..Default::default()
            },
            repo: Some(RepoConfig {
                unit: Some("kib".to_string()),
                ..Default::default()
            }),
            global_path: None,
            repo_path: None,
        };

        assert_eq!(config.unit(), Unit::Kib);
        assert_eq!(config.jobs(), Some(8));
    }
}
