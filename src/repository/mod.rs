//! Spec sources.
//!
//! [`SpecSource`] abstracts where raw task specs come from. This crate ships
//! only [`LocalSource`]; resolvers for git-hosted or cached specs live in the
//! embedding tool and implement the same trait.

use std::path::{Path, PathBuf};

use crate::error::SpecError;
use crate::spec::SpecFormat;

/// A resolved spec: raw text plus the directory its relative paths (template
/// files, subtask specs) are rooted at.
#[derive(Debug, Clone)]
pub struct ResolvedSpec {
    pub content: String,
    pub base_dir: PathBuf,
    pub format: SpecFormat,
}

/// Resolves a task location into a raw spec and base directory.
pub trait SpecSource {
    fn resolve(&self) -> Result<ResolvedSpec, SpecError>;
}

/// A spec file on the local filesystem; format derived from the extension.
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SpecSource for LocalSource {
    fn resolve(&self) -> Result<ResolvedSpec, SpecError> {
        let format = SpecFormat::from_path(&self.path).ok_or_else(|| {
            SpecError::Parse(format!(
                "cannot infer spec format from path {}",
                self.path.display()
            ))
        })?;
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SpecError::Parse(format!("cannot read spec {}: {e}", self.path.display()))
        })?;
        let base_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        Ok(ResolvedSpec {
            content,
            base_dir,
            format,
        })
    }
}
