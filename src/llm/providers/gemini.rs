//! Google Gemini API Provider
//!
//! This module implements the LLMProvider trait for the Gemini
//! `generateContent` endpoint.

use crate::config::DEFAULT_GEMINI_MODEL;
use crate::error::{DbForgeError, Result};
use crate::llm::client::LLMHttpClient;
use crate::llm::provider::{LLMProvider, LLMProviderBuilder, LLMResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Gemini API base URL, the model and method are appended per request
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API provider
pub struct GeminiProvider {
    /// API key for authentication
    api_key: String,
    /// Model to use (e.g., "gemini-2.5-flash")
    model: String,
    /// Base URL, without the model segment
    base_url: String,
    /// HTTP client for making requests
    client: LLMHttpClient,
}

impl GeminiProvider {
    /// Create a provider from builder settings
    pub fn from_builder(builder: &LLMProviderBuilder) -> Result<Self> {
        let client = LLMHttpClient::with_timeout("Gemini", builder.get_timeout())?
            .with_max_retries(builder.get_max_retries())
            .with_retry_delay(builder.get_retry_delay());

        Ok(Self {
            api_key: builder.get_api_key().unwrap_or_default().to_string(),
            model: builder.get_model().unwrap_or(DEFAULT_GEMINI_MODEL).to_string(),
            base_url: builder
                .get_base_url()
                .unwrap_or(GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    /// Full URL of the generateContent call for the configured model
    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Extract text content from the first candidate
    fn extract_content(&self, response: &GenerateResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<LLMResponse> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let headers = LLMHttpClient::build_headers_with_auth("x-goog-api-key", &self.api_key)?;
        tracing::debug!(model = %self.model, "sending Gemini request");
        let response_text = self
            .client
            .post_with_retry(&self.endpoint(), headers, &request)
            .await?;

        let response: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            DbForgeError::LLMApiError {
                provider: "Gemini".to_string(),
                message: format!("Failed to parse response: {}", e),
                status: 0,
            }
        })?;

        let content = self.extract_content(&response);
        let usage = response.usage_metadata.as_ref();

        Ok(LLMResponse {
            content,
            model: response.model_version.clone(),
            input_tokens: usage.and_then(|u| u.prompt_token_count),
            output_tokens: usage.and_then(|u| u.candidates_token_count),
            total_tokens: usage.and_then(|u| u.total_token_count),
            finish_reason: response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// generateContent request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Part {
    #[serde(default)]
    text: String,
}

/// generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}
