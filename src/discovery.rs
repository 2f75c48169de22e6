use std::path::{Path, PathBuf};
use ignore::WalkBuilder;
use anyhow::{Context, Result};

/// Finds the documents to track under a root directory
pub struct DocumentDiscovery {
    root_path: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl DocumentDiscovery {
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
            extensions: vec!["plist".to_string()],
            recursive: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// All matching files, normalized and sorted
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root_path.display());
        }

        let walker = WalkBuilder::new(&self.root_path)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.matches(path) {
                        files.push(normalize_path(path));
                    }
                }
                Err(err) => {
                    tracing::warn!("Error walking directory: {}", err);
                }
            }
        }

        files.sort();
        tracing::debug!("Discovered {} documents under {}", files.len(), self.root_path.display());
        Ok(files)
    }
}

/// Canonicalize the parent directory and keep the file name as-is.
///
/// Works for paths that no longer exist, so watcher events for removed or
/// replaced files map onto the same key as the discovered path.
pub fn normalize_path(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            std::fs::canonicalize(parent)
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Default location of user preference files
pub fn default_preferences_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join("Library").join("Preferences"))
}
