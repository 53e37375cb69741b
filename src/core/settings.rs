use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable per-run settings, created once per resolved task and shared by
/// reference into every operation's context view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// Directory defining the task. Templates and other data files are
    /// resolved relative to this location.
    pub source_dir: PathBuf,
    /// Target directory for modifications. In practice the embedding CLI
    /// sets this to the working directory.
    pub target_dir: PathBuf,
    /// Advisory flag: operations that modify the filesystem may skip their
    /// side effects when set. Not enforced by the framework.
    #[serde(default)]
    pub dry_run: bool,
}

impl ExecutionSettings {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        ExecutionSettings {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Settings for a nested sub-task rooted at a different source directory.
    /// Target directory and dry-run carry over from the parent run.
    pub fn derive(&self, source_dir: impl Into<PathBuf>) -> Self {
        ExecutionSettings {
            source_dir: source_dir.into(),
            target_dir: self.target_dir.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Resolve a path against the source directory unless absolute.
    pub fn resolve_source(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_dir.join(path)
        }
    }

    /// Resolve a path against the target directory unless absolute.
    pub fn resolve_target(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.target_dir.join(path)
        }
    }
}
