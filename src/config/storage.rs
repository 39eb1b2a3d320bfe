//! Environment File Storage
//!
//! This module handles the `.env` file at the project root: creating it with
//! default keys on first run and reading its key/value pairs.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment file name
pub const ENV_FILE: &str = ".env";

/// Content written when no environment file exists yet
pub const DEFAULT_ENV_CONTENT: &str = r#"FOLDERS=models,schemas
AVAILABLE_DB="MongoDB Atlas,Supabase - Prisma ORM,Firebase - Firestore"
GEMINI_API_KEY=
OPEN_ROUTER_MISTRAL=
MONGO_DB_URL=
FIREBASE_CREDENTIALS=
SUPABASE_DATABASE_URL=
SUPABASE_DIRECT_URL=
"#;

/// Create the environment file with default keys if it does not exist
///
/// Returns `true` when a new file was written.
pub fn ensure_env_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_ENV_CONTENT)?;
    tracing::info!(path = %path.display(), "created environment file");

    Ok(true)
}

/// Read all key/value pairs from an environment file
///
/// A missing file yields an empty map.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        vars.insert(key, value);
    }

    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_env_file_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);

        assert!(ensure_env_file(&path).unwrap());
        assert!(!ensure_env_file(&path).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, DEFAULT_ENV_CONTENT);
    }

    #[test]
    fn test_existing_env_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);
        fs::write(&path, "GEMINI_API_KEY=abc\n").unwrap();

        assert!(!ensure_env_file(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "GEMINI_API_KEY=abc\n");
    }

    #[test]
    fn test_read_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);
        ensure_env_file(&path).unwrap();

        let vars = read_env_file(&path).unwrap();
        assert_eq!(vars.get("FOLDERS").map(String::as_str), Some("models,schemas"));
        assert_eq!(vars.get("GEMINI_API_KEY").map(String::as_str), Some(""));
        assert_eq!(
            vars.get("AVAILABLE_DB").map(String::as_str),
            Some("MongoDB Atlas,Supabase - Prisma ORM,Firebase - Firestore")
        );
    }

    #[test]
    fn test_read_env_file_quoting_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);
        fs::write(
            &path,
            "# project settings\nDBFORGE_STORAGE_TEST='single $quoted'\nLOG_LEVEL=debug\n",
        )
        .unwrap();

        let vars = read_env_file(&path).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(
            vars.get("DBFORGE_STORAGE_TEST").map(String::as_str),
            Some("single $quoted")
        );
        assert_eq!(vars.get("LOG_LEVEL").map(String::as_str), Some("debug"));
        // Reading never touches the process environment
        assert!(std::env::var("DBFORGE_STORAGE_TEST").is_err());
    }

    #[test]
    fn test_malformed_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);
        fs::write(&path, "FOLDERS=models\nnot a pair\n").unwrap();

        assert!(matches!(
            read_env_file(&path),
            Err(crate::error::DbForgeError::EnvFile(_))
        ));
    }

    #[test]
    fn test_read_missing_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let vars = read_env_file(&dir.path().join(ENV_FILE)).unwrap();
        assert!(vars.is_empty());
    }
}
