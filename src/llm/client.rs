//! LLM HTTP Client
//!
//! This module provides a reusable HTTP client for making requests to LLM APIs,
//! with a request timeout, optional retry with exponential backoff, and error
//! handling.

use crate::error::{DbForgeError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

/// Default maximum number of retry attempts
const DEFAULT_MAX_RETRIES: u32 = 0;

/// Default initial retry delay in milliseconds
const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// HTTP client for LLM API requests
#[derive(Clone)]
pub struct LLMHttpClient {
    /// Reqwest HTTP client
    client: Client,
    /// Provider name used in error messages
    provider: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Initial retry delay in milliseconds
    initial_delay_ms: u64,
}

impl LLMHttpClient {
    /// Create a new HTTP client with a request timeout
    pub fn with_timeout(provider: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            provider: provider.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial retry delay
    pub fn with_retry_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    /// Make a POST request, retrying on rate limits and server errors
    ///
    /// # Arguments
    /// * `url` - Request URL
    /// * `headers` - Request headers
    /// * `body` - Request body (serializable)
    ///
    /// # Returns
    /// Response body as string
    pub async fn post_with_retry<T: Serialize>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<String> {
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .post(url)
                .headers(headers.clone())
                .json(body)
                .send()
                .await?;

            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            if self.should_retry(status, attempt) {
                let delay = self.calculate_delay(attempt);
                tracing::warn!(
                    provider = %self.provider,
                    status = status.as_u16(),
                    delay_ms = delay,
                    "retrying LLM request"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
                continue;
            }

            let response_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            return Err(DbForgeError::LLMApiError {
                provider: self.provider.clone(),
                message: response_text,
                status: status.as_u16(),
            });
        }
    }

    /// Check if a request should be retried
    fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::REQUEST_TIMEOUT
            || status.is_server_error()
    }

    /// Calculate retry delay with exponential backoff
    fn calculate_delay(&self, attempt: u32) -> u64 {
        self.initial_delay_ms * 2_u64.pow(attempt)
    }

    /// Build standard bearer-token headers for API requests
    pub fn build_headers(api_key: &str) -> Result<HeaderMap> {
        Self::build_headers_with_auth(AUTHORIZATION.as_str(), &format!("Bearer {}", api_key))
    }

    /// Build headers with custom authorization format
    pub fn build_headers_with_auth(auth_header: &str, auth_value: &str) -> Result<HeaderMap> {
        let headers = HeaderMap::new();
        let mut headers = Self::add_header(headers, auth_header, auth_value)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Add custom header to existing headers
    pub fn add_header(mut headers: HeaderMap, key: &str, value: &str) -> Result<HeaderMap> {
        let key_header = HeaderName::from_str(key)
            .map_err(|_| DbForgeError::InvalidHeader(format!("Invalid header name: {}", key)))?;
        // Values carry credentials, keep them out of the error text.
        let value_header = HeaderValue::from_str(value)
            .map_err(|_| DbForgeError::InvalidHeader(format!("Invalid value for header {}", key)))?;

        headers.insert(key_header, value_header);
        Ok(headers)
    }
}
