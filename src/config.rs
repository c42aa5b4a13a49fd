//! Configuration loading and merging.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// How commands are spawned.
    pub exec: ExecConfig,

    /// Audit logging settings.
    pub audit: AuditConfig,

    /// Diagnostic logging settings.
    pub log: LogConfig,
}

/// Process spawning configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExecConfig {
    /// Directory commands run in (defaults to the current directory).
    pub working_dir: Option<String>,
    /// Start commands with an empty environment.
    pub clear_env: bool,
    /// Extra environment variables for every command.
    pub env: BTreeMap<String, String>,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: bool,
    /// Path to audit log file.
    pub path: Option<String>,
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `SHELL_LINE_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // User config ($SHELL_LINE_CONFIG or ~/.config/shell-line/config.toml)
        if let Some(path) = Self::user_config_path() {
            if let Some(user_config) = Self::load_file(&path)? {
                config = user_config;
            }
        }

        // Project config (.shell-line.toml in cwd)
        if let Some(cwd) = cwd {
            if let Some(project_config) = Self::load_file(&cwd.join(".shell-line.toml"))? {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// Parse a config file, `None` if it does not exist.
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Get user config path.
    /// Respects SHELL_LINE_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SHELL_LINE_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("shell-line/config.toml"))
    }

    /// Merge another config into this one (other takes precedence for scalars).
    fn merge(&mut self, other: Config) {
        self.exec.env.extend(other.exec.env);
        if other.exec.working_dir.is_some() {
            self.exec.working_dir = other.exec.working_dir;
        }
        if other.exec.clear_env {
            self.exec.clear_env = true;
        }

        if other.audit.enabled {
            self.audit.enabled = true;
        }
        if other.audit.path.is_some() {
            self.audit.path = other.audit.path;
        }

        if other.log != LogConfig::default() {
            self.log = other.log;
        }
    }

    /// Audit log path, if auditing is enabled and a path is set.
    pub fn audit_path(&self) -> Option<&Path> {
        if !self.audit.enabled {
            return None;
        }
        self.audit.path.as_deref().map(Path::new)
    }
}
