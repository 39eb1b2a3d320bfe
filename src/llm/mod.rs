//! LLM integration module
//!
//! This module provides trait-based LLM provider abstraction
//! and implementations for the hosted services the generators use.

pub mod client;
pub mod provider;

#[cfg(test)]
pub(crate) mod test_server;

// Provider implementations
pub mod providers {
    pub mod gemini;
    pub mod openrouter;
}

// Re-exports
pub use provider::{LLMProvider, LLMProviderBuilder, LLMResponse};

use crate::config::AppConfig;
use crate::error::Result;
use providers::gemini::GeminiProvider;
use providers::openrouter::OpenRouterProvider;

/// Builder with the request settings shared by both providers
fn builder_from_config(
    config: &AppConfig,
    api_key: Option<&String>,
    model: &str,
    base_url: Option<&String>,
) -> LLMProviderBuilder {
    let builder = LLMProviderBuilder::new()
        .with_api_key(api_key.cloned().unwrap_or_default())
        .with_model(model)
        .with_timeout(config.llm_timeout_secs)
        .with_max_retries(config.llm_max_retries)
        .with_retry_delay(config.llm_retry_delay_ms);

    match base_url {
        Some(url) => builder.with_base_url(url.clone()),
        None => builder,
    }
}

/// Build the OpenRouter client used for intent and infrastructure generation
pub fn open_router_from_config(config: &AppConfig) -> Result<OpenRouterProvider> {
    let builder = builder_from_config(
        config,
        config.open_router_api_key.as_ref(),
        &config.open_router_model,
        config.open_router_base_url.as_ref(),
    );
    OpenRouterProvider::from_builder(&builder)
}

/// Build the Gemini client used for schema generation
pub fn gemini_from_config(config: &AppConfig) -> Result<GeminiProvider> {
    let builder = builder_from_config(
        config,
        config.gemini_api_key.as_ref(),
        &config.gemini_model,
        config.gemini_base_url.as_ref(),
    );
    GeminiProvider::from_builder(&builder)
}
