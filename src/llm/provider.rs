//! LLM Provider Trait
//!
//! This module defines the trait-based abstraction for LLM providers. Every
//! generation step talks to a provider through [`LLMProvider::complete`], so
//! both hosted backends share one success-or-error contract.

use crate::error::{DbForgeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Generated text content
    pub content: String,
    /// Number of tokens used (input)
    pub input_tokens: Option<u32>,
    /// Number of tokens used (output)
    pub output_tokens: Option<u32>,
    /// Total tokens used
    pub total_tokens: Option<u32>,
    /// Model used for generation
    pub model: Option<String>,
    /// Finish reason (e.g., "stop", "length")
    pub finish_reason: Option<String>,
}

impl LLMResponse {
    /// Create a new response
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            input_tokens: None,
            output_tokens: None,
            total_tokens: None,
            model: None,
            finish_reason: None,
        }
    }

    /// Get total token count if available
    pub fn get_total_tokens(&self) -> Option<u32> {
        self.total_tokens.or_else(|| {
            self.input_tokens
                .and_then(|input| self.output_tokens.map(|output| input + output))
        })
    }
}

/// Trait for LLM providers
///
/// This trait defines the interface that all LLM providers must implement,
/// enabling easy addition of new AI services.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send `prompt` as a single user message
    ///
    /// # Arguments
    /// * `prompt` - Fully rendered prompt text
    ///
    /// # Returns
    /// The LLM response
    async fn generate(&self, prompt: &str) -> Result<LLMResponse>;

    /// Generate and return the trimmed reply text
    ///
    /// An empty reply is reported as an error.
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.validate_config()?;

        let response = self.generate(prompt).await?;
        tracing::debug!(
            provider = self.provider_name(),
            tokens = ?response.get_total_tokens(),
            finish_reason = ?response.finish_reason,
            "completion received"
        );

        let content = response.content.trim();
        if content.is_empty() {
            return Err(DbForgeError::LLMProvider(format!(
                "{} returned an empty reply",
                self.provider_name()
            )));
        }

        Ok(content.to_string())
    }

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the provider has an API key configured
    fn has_api_key(&self) -> bool;

    /// Validate the provider configuration
    fn validate_config(&self) -> Result<()> {
        if !self.has_api_key() {
            return Err(DbForgeError::LLMApiKeyMissing(
                self.provider_name().to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for creating LLM providers
pub struct LLMProviderBuilder {
    /// API key for the provider
    api_key: Option<String>,
    /// Base URL for API requests (for custom endpoints)
    base_url: Option<String>,
    /// Model to use
    model: Option<String>,
    /// Timeout for requests (in seconds)
    timeout: u64,
    /// Retries on 429/5xx replies
    max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    retry_delay_ms: u64,
}

impl Default for LLMProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout: crate::config::DEFAULT_LLM_TIMEOUT_SECS,
            max_retries: 0,
            retry_delay_ms: crate::config::DEFAULT_LLM_RETRY_DELAY_MS,
        }
    }
}

impl LLMProviderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial retry delay
    pub fn with_retry_delay(mut self, delay_ms: u64) -> Self {
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Get the API key
    pub fn get_api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Get the base URL
    pub fn get_base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Get the model
    pub fn get_model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Get the timeout
    pub fn get_timeout(&self) -> u64 {
        self.timeout
    }

    /// Get the retry budget
    pub fn get_max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the initial retry delay
    pub fn get_retry_delay(&self) -> u64 {
        self.retry_delay_ms
    }
}
