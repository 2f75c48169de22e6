use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::PrefDiffConfig;
use crate::diff::DiffAlgorithmType;
use crate::discovery::{default_preferences_dir, DocumentDiscovery};

#[derive(Parser)]
#[command(name = "prefdiff")]
#[command(version)]
#[command(about = "Watch preference files and print what changed inside them")]
#[command(long_about = "prefdiff flattens every preference file into sorted `path : type = value` lines, then prints a unified diff of those lines each time a file is rewritten.")]
pub struct Cli {
    /// Directory holding the documents to watch
    #[arg(value_name = "PATH", help = "Directory to watch (defaults to ~/Library/Preferences)")]
    pub path: Option<PathBuf>,

    /// Only track files with these extensions
    #[arg(long, value_delimiter = ',', help = "Document extensions to track (e.g., plist,json,toml)")]
    pub extensions: Option<Vec<String>>,

    /// Descend into subdirectories
    #[arg(short, long, help = "Discover documents recursively")]
    pub recursive: bool,

    /// Diff context lines
    #[arg(long, help = "Number of context lines in diffs")]
    pub context: Option<usize>,

    /// Diff algorithm
    #[arg(long, help = "Diff algorithm")]
    pub algorithm: Option<DiffAlgorithmType>,

    /// Output format
    #[arg(long, default_value = "text", help = "Output format")]
    pub output: OutputFormat,

    /// Configuration file
    #[arg(long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Disable colors in output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Unified diff per change (default)
    Text,
    /// One JSON object per change for scripting
    Json,
}

impl Cli {
    pub fn get_watch_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            default_preferences_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }

    /// File config (or environment), then command line overrides
    pub fn resolve_config(&self) -> Result<PrefDiffConfig> {
        let mut config = match &self.config {
            Some(path) => PrefDiffConfig::load(path)?,
            None => PrefDiffConfig::default(),
        };
        config.apply_env();

        if let Some(extensions) = &self.extensions {
            config.watcher.extensions = extensions.clone();
        }
        if self.recursive {
            config.watcher.recursive = true;
        }
        if let Some(context) = self.context {
            config.diff.context_lines = context;
        }
        if let Some(algorithm) = self.algorithm {
            config.diff.algorithm = algorithm;
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn discovery(&self, config: &PrefDiffConfig) -> DocumentDiscovery {
        DocumentDiscovery::new(self.get_watch_path())
            .with_extensions(config.watcher.extensions.clone())
            .recursive(config.watcher.recursive)
    }

    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(!self.no_color)
            .init();
    }

    pub fn validate(&self) -> Result<(), String> {
        let path = self.get_watch_path();

        if !path.exists() {
            return Err(format!("Path does not exist: {}", path.display()));
        }

        if !path.is_dir() {
            return Err(format!("Path is not a directory: {}", path.display()));
        }

        if let Some(extensions) = &self.extensions {
            if extensions.iter().all(|e| e.trim().is_empty()) {
                return Err("At least one extension is required".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "prefdiff",
            "/tmp",
            "--extensions",
            "plist,json",
            "--context",
            "1",
            "--algorithm",
            "patience",
            "--output",
            "json",
        ]);

        assert_eq!(cli.path, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.extensions, Some(vec!["plist".to_string(), "json".to_string()]));
        assert_eq!(cli.context, Some(1));
        assert_eq!(cli.algorithm, Some(DiffAlgorithmType::Patience));
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["prefdiff", "--context", "0", "--extensions", "toml", "-r"]);

        let config = cli.resolve_config().unwrap();

        assert_eq!(config.diff.context_lines, 0);
        assert_eq!(config.watcher.extensions, vec!["toml"]);
        assert!(config.watcher.recursive);
    }

    #[test]
    fn test_validate_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().to_string_lossy().into_owned();
        assert!(Cli::parse_from(["prefdiff", dir.as_str()]).validate().is_ok());

        let missing = temp_dir.path().join("missing").to_string_lossy().into_owned();
        assert!(Cli::parse_from(["prefdiff", missing.as_str()]).validate().is_err());
    }
}
