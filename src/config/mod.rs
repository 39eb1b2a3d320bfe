//! Configuration module
//!
//! This module builds the single [`AppConfig`] the rest of the application is
//! handed at startup. Values come from the project's `.env` file, with process
//! environment variables taking precedence.

pub mod storage;

use crate::error::{DbForgeError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Default OpenRouter model
pub const DEFAULT_OPEN_ROUTER_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for LLM requests (in seconds)
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Default delay before the first LLM retry (in milliseconds)
pub const DEFAULT_LLM_RETRY_DELAY_MS: u64 = 1000;

/// Default timeout for package setup commands (in seconds)
pub const DEFAULT_SETUP_TIMEOUT_SECS: u64 = 600;

/// Every key the application reads
const KNOWN_KEYS: &[&str] = &[
    "FOLDERS",
    "AVAILABLE_DB",
    "GEMINI_API_KEY",
    "OPEN_ROUTER_MISTRAL",
    "MONGO_DB_URL",
    "FIREBASE_CREDENTIALS",
    "SUPABASE_DATABASE_URL",
    "SUPABASE_DIRECT_URL",
    "OPEN_ROUTER_MODEL",
    "GEMINI_MODEL",
    "LLM_TIMEOUT_SECS",
    "LLM_MAX_RETRIES",
    "LLM_RETRY_DELAY_MS",
    "OPEN_ROUTER_BASE_URL",
    "GEMINI_BASE_URL",
    "SETUP_COMMAND_TIMEOUT_SECS",
    "LOG_LEVEL",
];

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Subfolders to scaffold under `src/`
    pub folders: Vec<String>,
    /// Backend labels offered at selection time
    pub available_db: Vec<String>,
    /// Gemini API key (schema generation)
    pub gemini_api_key: Option<String>,
    /// OpenRouter API key (intent and infrastructure generation)
    pub open_router_api_key: Option<String>,
    /// Model used through OpenRouter
    pub open_router_model: String,
    /// Model used through Gemini
    pub gemini_model: String,
    /// OpenRouter chat completions URL override (proxies, local gateways)
    pub open_router_base_url: Option<String>,
    /// Gemini models URL override
    pub gemini_base_url: Option<String>,
    /// MongoDB connection string
    pub mongo_db_url: Option<String>,
    /// Path to the Firebase service account file
    pub firebase_credentials: Option<String>,
    /// Supabase pooled connection string
    pub supabase_database_url: Option<String>,
    /// Supabase direct connection string
    pub supabase_direct_url: Option<String>,
    /// Per-request LLM timeout in seconds
    pub llm_timeout_secs: u64,
    /// Retries on 429/5xx replies
    pub llm_max_retries: u32,
    /// Delay before the first retry in milliseconds, doubled per retry
    pub llm_retry_delay_ms: u64,
    /// Timeout for each package setup command in seconds
    pub setup_timeout_secs: u64,
    /// Log filter level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            available_db: Vec::new(),
            gemini_api_key: None,
            open_router_api_key: None,
            open_router_model: DEFAULT_OPEN_ROUTER_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            open_router_base_url: None,
            gemini_base_url: None,
            mongo_db_url: None,
            firebase_credentials: None,
            supabase_database_url: None,
            supabase_direct_url: None,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            llm_max_retries: 0,
            llm_retry_delay_ms: DEFAULT_LLM_RETRY_DELAY_MS,
            setup_timeout_secs: DEFAULT_SETUP_TIMEOUT_SECS,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an environment file, letting values returned
    /// by `lookup` override file values
    pub fn load_with<F>(env_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = storage::read_env_file(env_path)?;

        for key in KNOWN_KEYS {
            if let Some(value) = lookup(key) {
                vars.insert((*key).to_string(), value);
            }
        }

        Self::from_vars(&vars)
    }

    /// Build configuration from raw key/value pairs
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let text = |key: &str| -> Option<String> {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            folders: split_list(vars.get("FOLDERS")),
            available_db: split_list(vars.get("AVAILABLE_DB")),
            gemini_api_key: text("GEMINI_API_KEY"),
            open_router_api_key: text("OPEN_ROUTER_MISTRAL"),
            open_router_model: text("OPEN_ROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_OPEN_ROUTER_MODEL.to_string()),
            gemini_model: text("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            open_router_base_url: text("OPEN_ROUTER_BASE_URL"),
            gemini_base_url: text("GEMINI_BASE_URL"),
            mongo_db_url: text("MONGO_DB_URL"),
            firebase_credentials: text("FIREBASE_CREDENTIALS"),
            supabase_database_url: text("SUPABASE_DATABASE_URL"),
            supabase_direct_url: text("SUPABASE_DIRECT_URL"),
            llm_timeout_secs: parse_number(vars, "LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?,
            llm_max_retries: parse_number(vars, "LLM_MAX_RETRIES", 0)?,
            llm_retry_delay_ms: parse_number(
                vars,
                "LLM_RETRY_DELAY_MS",
                DEFAULT_LLM_RETRY_DELAY_MS,
            )?,
            setup_timeout_secs: parse_number(
                vars,
                "SETUP_COMMAND_TIMEOUT_SECS",
                DEFAULT_SETUP_TIMEOUT_SECS,
            )?,
            log_level: text("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }
}

/// Log level known before the configuration is loaded
///
/// Same precedence as [`AppConfig::load_with`], but a missing or unreadable
/// file only means the default.
pub fn startup_log_level<F>(env_path: &Path, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |v: String| Some(v.trim().to_string()).filter(|v| !v.is_empty());

    lookup("LOG_LEVEL")
        .and_then(non_blank)
        .or_else(|| {
            storage::read_env_file(env_path)
                .ok()
                .and_then(|mut vars| vars.remove("LOG_LEVEL"))
                .and_then(non_blank)
        })
        .unwrap_or_else(|| "warn".to_string())
}

/// Lookup into the process environment, for [`AppConfig::load_with`]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Split a comma separated value, dropping blank entries
fn split_list(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_number<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T> {
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| DbForgeError::Config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.folders.is_empty());
        assert!(config.available_db.is_empty());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.open_router_model, DEFAULT_OPEN_ROUTER_MODEL);
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert_eq!(config.llm_max_retries, 0);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_empty_vars_match_default() {
        assert_eq!(AppConfig::from_vars(&HashMap::new()).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_lists_are_trimmed() {
        let config = AppConfig::from_vars(&vars(&[
            ("FOLDERS", " models , schemas,, "),
            ("AVAILABLE_DB", "MongoDB Atlas, Supabase - Prisma ORM"),
        ]))
        .unwrap();

        assert_eq!(config.folders, vec!["models", "schemas"]);
        assert_eq!(config.available_db, vec!["MongoDB Atlas", "Supabase - Prisma ORM"]);
    }

    #[test]
    fn test_blank_keys_are_none() {
        let config = AppConfig::from_vars(&vars(&[
            ("GEMINI_API_KEY", ""),
            ("OPEN_ROUTER_MISTRAL", "sk-or-123"),
        ]))
        .unwrap();

        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.open_router_api_key.as_deref(), Some("sk-or-123"));
    }

    #[test]
    fn test_invalid_number() {
        let result = AppConfig::from_vars(&vars(&[("LLM_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(DbForgeError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(storage::ENV_FILE);
        storage::ensure_env_file(&path).unwrap();

        let config = AppConfig::load_with(&path, |_| None).unwrap();
        assert_eq!(config.folders, vec!["models", "schemas"]);
        assert_eq!(config.available_db.len(), 3);
        assert_eq!(config.available_db[1], "Supabase - Prisma ORM");
    }

    #[test]
    fn test_process_values_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(storage::ENV_FILE);
        std::fs::write(&path, "FOLDERS=models\nGEMINI_API_KEY=from-file\nLLM_MAX_RETRIES=1\n")
            .unwrap();

        let config = AppConfig::load_with(&path, |key| match key {
            "GEMINI_API_KEY" => Some("from-env".to_string()),
            "LLM_MAX_RETRIES" => Some("4".to_string()),
            "OPEN_ROUTER_BASE_URL" => Some("http://127.0.0.1:8080/chat".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.folders, vec!["models"]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.llm_max_retries, 4);
        assert_eq!(
            config.open_router_base_url.as_deref(),
            Some("http://127.0.0.1:8080/chat")
        );
        assert_eq!(config.gemini_base_url, None);
    }

    #[test]
    fn test_missing_file_uses_lookup_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(storage::ENV_FILE);

        let config = AppConfig::load_with(&path, |key| {
            (key == "AVAILABLE_DB").then(|| "MongoDB Atlas".to_string())
        })
        .unwrap();

        assert_eq!(config.available_db, vec!["MongoDB Atlas"]);
        assert!(config.folders.is_empty());
    }

    #[test]
    fn test_startup_log_level_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(storage::ENV_FILE);

        assert_eq!(startup_log_level(&path, |_| None), "warn");

        std::fs::write(&path, "LOG_LEVEL=debug\n").unwrap();
        assert_eq!(startup_log_level(&path, |_| None), "debug");
        assert_eq!(startup_log_level(&path, |_| Some("  ".to_string())), "debug");
        assert_eq!(
            startup_log_level(&path, |key| (key == "LOG_LEVEL").then(|| "trace".to_string())),
            "trace"
        );

        std::fs::write(&path, "not a pair\n").unwrap();
        assert_eq!(startup_log_level(&path, |_| None), "warn");
    }
}
