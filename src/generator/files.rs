//! Writing generated files
//!
//! All generated content lands under the project's `src/` directory.
//! Existing files are overwritten without backup.

use crate::error::{DbForgeError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Write `content` trimmed and terminated by exactly one newline, creating
/// parent directories as needed
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut text = content.trim().to_string();
    text.push('\n');
    fs::write(path, text)?;

    Ok(())
}

/// Resolve a model-provided relative path against `base`
///
/// Absolute paths and `..` components are rejected.
pub fn resolve_relative(base: &Path, relative: &str) -> Result<PathBuf> {
    let candidate = Path::new(relative.trim());

    if relative.trim().is_empty() {
        return Err(DbForgeError::InvalidPath(relative.to_string()));
    }

    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(DbForgeError::InvalidPath(relative.to_string())),
        }
    }

    Ok(base.join(candidate))
}

/// Write every `(relative path, content)` pair under `base`
///
/// Stops at the first failure. Returns the paths written, in input order.
pub fn write_generated_files<'a, I>(base: &Path, files: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut written = Vec::new();

    for (relative, content) in files {
        let path = resolve_relative(base, relative)?;
        write_text_file(&path, content)?;
        tracing::info!(path = %path.display(), "wrote generated file");
        written.push(path);
    }

    Ok(written)
}
