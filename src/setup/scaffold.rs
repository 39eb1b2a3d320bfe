//! Project scaffolding
//!
//! Fixed layout of the project being generated into, and the folders and
//! environment file created before the first prompt.

use crate::config::storage::{self, ENV_FILE};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths inside the target project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    /// Project root (the working directory)
    pub root: PathBuf,
    /// `<root>/src`
    pub src_dir: PathBuf,
    /// `<root>/src/lib`
    pub lib_dir: PathBuf,
    /// `<root>/.env`
    pub env_path: PathBuf,
    /// `<root>/src/schemas/mermaid.mmd`
    pub diagram_path: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let src_dir = root.join("src");

        Self {
            lib_dir: src_dir.join("lib"),
            env_path: root.join(ENV_FILE),
            diagram_path: src_dir.join("schemas").join("mermaid.mmd"),
            src_dir,
            root,
        }
    }

    /// Layout rooted at the current working directory
    pub fn current() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Create the environment file if missing
    pub fn ensure_env_file(&self) -> Result<bool> {
        storage::ensure_env_file(&self.env_path)
    }

    /// Create `src/`, `src/lib/` and each configured folder under `src/`
    ///
    /// Returns the directories that did not exist before, relative to the
    /// project root.
    pub fn scaffold(&self, folders: &[String]) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();

        let mut targets = vec![self.src_dir.clone(), self.lib_dir.clone()];
        targets.extend(
            folders
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .map(|f| self.src_dir.join(f)),
        );

        for dir in targets {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(&dir)?;
            tracing::debug!(dir = %dir.display(), "created folder");
            created.push(self.relative(&dir));
        }

        Ok(created)
    }

    /// Path relative to the project root, for display
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
