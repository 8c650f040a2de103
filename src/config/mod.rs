//! Configuration module
//!
//! Handles loading and managing configuration.

pub mod env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;
use crate::utils::LogLevel;

pub use env::EnvConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./run-summary.yaml",
    "./run-summary.yml",
    "./.run-summary.yaml",
    "~/.config/run-summary/config.yaml",
    "~/.run-summary.yaml",
];

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output format (text, json, json-pretty)
    pub format: String,

    /// Print the failures section after the overview
    pub show_failures: bool,

    /// Replay node events in parallel
    pub parallel: bool,

    /// Maximum concurrent event chains during parallel replay
    pub max_concurrent: usize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            show_failures: true,
            parallel: false,
            max_concurrent: 4,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load configuration from the first standard location, or defaults
    pub fn load_default() -> Result<Self> {
        match Self::find() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if OutputFormat::from_str(&self.format).is_none() {
            anyhow::bail!("Unsupported output format: {}", self.format);
        }
        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Unsupported log level: {}", self.log_level);
        }
        if self.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be at least 1");
        }
        Ok(())
    }

    /// Apply environment overrides (environment takes precedence)
    pub fn merge_env(&mut self, env: &EnvConfig) {
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(show_failures) = env.show_failures {
            self.show_failures = show_failures;
        }
        if let Some(parallel) = env.parallel {
            self.parallel = parallel;
        }
        if let Some(max_concurrent) = env.max_concurrent {
            self.max_concurrent = max_concurrent;
        }
        if let Some(log_level) = &env.log_level {
            self.log_level = log_level.clone();
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.format).unwrap_or(OutputFormat::Text)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or(LogLevel::Warn)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.format, "text");
        assert!(config.show_failures);
        assert_eq!(config.max_concurrent, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            format: "json".to_string(),
            parallel: true,
            ..Default::default()
        };

        for name in ["nested/config.yaml", "config.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(AppConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "show_failures: false\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(!config.show_failures);
        assert_eq!(config.format, "text");
        assert_eq!(config.max_concurrent, 4);
    }

    #[test]
    fn test_validate_config() {
        let bad_format = AppConfig {
            format: "csv".to_string(),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());

        let no_workers = AppConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(no_workers.validate().is_err());
    }

    #[test]
    fn test_merge_env() {
        let mut config = AppConfig::default();
        config.merge_env(&EnvConfig {
            format: Some("json-pretty".to_string()),
            max_concurrent: Some(16),
            ..Default::default()
        });

        assert_eq!(config.output_format(), OutputFormat::JsonPretty);
        assert_eq!(config.max_concurrent, 16);
        assert!(config.show_failures);
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }
}
