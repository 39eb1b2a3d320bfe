//! Error types for DbForge
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Result type alias for DbForge
pub type Result<T> = std::result::Result<T, DbForgeError>;

/// Main error type for DbForge
#[derive(Error, Debug)]
pub enum DbForgeError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Environment file errors
    #[error("Environment file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider errors
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    /// Provider has no API key
    #[error("No API key configured for {0}")]
    LLMApiKeyMissing(String),

    /// Non-success reply from an LLM API
    #[error("{provider} API error (status {status}): {message}")]
    LLMApiError {
        provider: String,
        message: String,
        status: u16,
    },

    /// Header could not be built
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A reply envelope was missing a required context field
    #[error("Reply from {step} is missing `{field}`")]
    MissingField { step: String, field: String },

    /// Backend label that maps to no known backend
    #[error("Unsupported database: {0}")]
    UnsupportedBackend(String),

    /// Generated file path escapes the source directory
    #[error("Refusing to write outside the source directory: {0}")]
    InvalidPath(String),

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// User backed out of a prompt
    #[error("Cancelled by user")]
    Cancelled,
}

impl From<rustyline::error::ReadlineError> for DbForgeError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof => {
                DbForgeError::Cancelled
            }
            other => DbForgeError::Prompt(other.to_string()),
        }
    }
}

impl DbForgeError {
    /// Shorthand for a missing context field
    pub fn missing_field(step: impl Into<String>, field: impl Into<String>) -> Self {
        DbForgeError::MissingField {
            step: step.into(),
            field: field.into(),
        }
    }
}
