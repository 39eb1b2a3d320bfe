//! OpenRouter API Provider
//!
//! This module implements the LLMProvider trait for OpenRouter's
//! OpenAI-compatible chat completions endpoint.

use crate::config::DEFAULT_OPEN_ROUTER_MODEL;
use crate::error::{DbForgeError, Result};
use crate::llm::client::LLMHttpClient;
use crate::llm::provider::{LLMProvider, LLMProviderBuilder, LLMResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenRouter chat completions URL
const OPEN_ROUTER_API_BASE: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API provider
pub struct OpenRouterProvider {
    /// API key for authentication
    api_key: String,
    /// Model to use (e.g., "mistralai/mistral-small-3.2-24b-instruct:free")
    model: String,
    /// Endpoint URL
    base_url: String,
    /// HTTP client for making requests
    client: LLMHttpClient,
}

impl OpenRouterProvider {
    /// Create a provider from builder settings
    pub fn from_builder(builder: &LLMProviderBuilder) -> Result<Self> {
        let client = LLMHttpClient::with_timeout("OpenRouter", builder.get_timeout())?
            .with_max_retries(builder.get_max_retries())
            .with_retry_delay(builder.get_retry_delay());

        Ok(Self {
            api_key: builder.get_api_key().unwrap_or_default().to_string(),
            model: builder
                .get_model()
                .unwrap_or(DEFAULT_OPEN_ROUTER_MODEL)
                .to_string(),
            base_url: builder
                .get_base_url()
                .unwrap_or(OPEN_ROUTER_API_BASE)
                .to_string(),
            client,
        })
    }

    /// Extract text content from a chat completion
    fn extract_content(&self, response: &ChatResponse) -> String {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    async fn generate(&self, prompt: &str) -> Result<LLMResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let headers = LLMHttpClient::build_headers(&self.api_key)?;
        tracing::debug!(model = %self.model, "sending OpenRouter request");
        let response_text = self
            .client
            .post_with_retry(&self.base_url, headers, &request)
            .await?;

        let response: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            DbForgeError::LLMApiError {
                provider: "OpenRouter".to_string(),
                message: format!("Failed to parse response: {}", e),
                status: 0,
            }
        })?;

        if let Some(error) = &response.error {
            return Err(DbForgeError::LLMApiError {
                provider: "OpenRouter".to_string(),
                message: error.message.clone(),
                status: error.status(),
            });
        }

        let content = self.extract_content(&response);

        Ok(LLMResponse {
            content,
            model: response.model.clone(),
            input_tokens: response.usage.as_ref().map(|u| u.prompt_tokens),
            output_tokens: response.usage.as_ref().map(|u| u.completion_tokens),
            total_tokens: response.usage.as_ref().map(|u| u.total_tokens),
            finish_reason: response
                .choices
                .first()
                .and_then(|c| c.finish_reason.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response
///
/// OpenRouter can answer 200 with an `error` object instead of choices.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize, Clone)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error object; upstream providers send `code` as a number or a string
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ApiError {
    /// HTTP-like status carried by `code`, 0 when absent or not numeric
    fn status(&self) -> u16 {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .and_then(|code| u16::try_from(code).ok())
        .unwrap_or(0)
    }
}
