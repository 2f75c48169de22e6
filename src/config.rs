//! Configuration management for prefdiff
//!
//! Defaults, environment overrides and an optional TOML file. Command line
//! flags are applied on top by [`crate::cli::Cli::resolve_config`].

use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::diff::{DiffAlgorithmType, DiffConfig, DiffGenerator, DEFAULT_CONTEXT_LINES};

/// Global configuration for prefdiff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefDiffConfig {
    /// Document discovery and watching
    pub watcher: WatcherConfig,
    /// Diff generation
    pub diff: DiffSettings,
}

/// Configuration for file watching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// File extensions treated as documents
    pub extensions: Vec<String>,
    /// Descend into subdirectories during discovery
    pub recursive: bool,
    /// How long the consumer loop blocks before checking for shutdown
    pub recv_timeout_ms: u64,
}

/// Configuration for diff output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    pub algorithm: DiffAlgorithmType,
    /// Unchanged lines shown around each change
    pub context_lines: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["plist".to_string()],
            recursive: false,
            recv_timeout_ms: 100,
        }
    }
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            algorithm: DiffAlgorithmType::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl WatcherConfig {
    pub fn recv_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

impl DiffSettings {
    pub fn build_generator(&self) -> DiffGenerator {
        DiffConfig::new()
            .algorithm(self.algorithm)
            .context_lines(self.context_lines)
            .build()
    }
}

impl PrefDiffConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields with environment variables if present
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("PREFDIFF_CONTEXT_LINES") {
            match val.parse::<usize>() {
                Ok(lines) => self.diff.context_lines = lines,
                Err(_) => tracing::warn!("Ignoring PREFDIFF_CONTEXT_LINES={}", val),
            }
        }

        if let Ok(val) = std::env::var("PREFDIFF_ALGORITHM") {
            match val.parse::<DiffAlgorithmType>() {
                Ok(algorithm) => self.diff.algorithm = algorithm,
                Err(err) => tracing::warn!("Ignoring PREFDIFF_ALGORITHM: {}", err),
            }
        }

        if let Ok(val) = std::env::var("PREFDIFF_RECV_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.watcher.recv_timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring PREFDIFF_RECV_TIMEOUT_MS={}", val),
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.watcher.extensions.is_empty() {
            return Err("extensions must not be empty".to_string());
        }

        if self.watcher.recv_timeout_ms == 0 {
            return Err("recv_timeout_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PrefDiffConfig::default();

        assert_eq!(config.watcher.extensions, vec!["plist"]);
        assert_eq!(config.diff.context_lines, 3);
        assert_eq!(config.diff.algorithm, DiffAlgorithmType::Myers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PrefDiffConfig::default();

        config.watcher.extensions.clear();
        assert!(config.validate().is_err());

        config.watcher.extensions = vec!["json".to_string()];
        config.watcher.recv_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = WatcherConfig::default();
        assert_eq!(config.recv_timeout_duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("prefdiff.toml");
        fs::write(&path, "[diff]\nalgorithm = \"patience\"\ncontext_lines = 1\n").unwrap();

        let config = PrefDiffConfig::load(&path).unwrap();

        assert_eq!(config.diff.algorithm, DiffAlgorithmType::Patience);
        assert_eq!(config.diff.context_lines, 1);
        assert_eq!(config.watcher, WatcherConfig::default());
        assert_eq!(config.diff.build_generator().algorithm_name(), "Patience");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("prefdiff.toml");
        fs::write(&path, "[diff]\nalgorithm = \"fastest\"\n").unwrap();

        assert!(PrefDiffConfig::load(&path).is_err());
        assert!(PrefDiffConfig::load(temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_config_loading() {
        std::env::set_var("PREFDIFF_CONTEXT_LINES", "5");
        std::env::set_var("PREFDIFF_ALGORITHM", "lcs");

        let config = PrefDiffConfig::from_env();

        assert_eq!(config.diff.context_lines, 5);
        assert_eq!(config.diff.algorithm, DiffAlgorithmType::Lcs);

        // Cleanup
        std::env::remove_var("PREFDIFF_CONTEXT_LINES");
        std::env::remove_var("PREFDIFF_ALGORITHM");
    }
}
