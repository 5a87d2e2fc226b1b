//! Anthropic Client
//!
//! Completion client for the Anthropic Messages API.

use async_trait::async_trait;
use serde::Deserialize;

use super::llm_client::{preview, CompletionSettings, TextCompleter};
use crate::error::CompletionError;

const MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "Anthropic";

/// Anthropic Claude API client
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
    settings: CompletionSettings,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key and settings
    pub fn new(api_key: String, settings: CompletionSettings) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Internal API call implementation
    async fn call_api(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(MESSAGES_ENDPOINT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": &self.settings.model,
                "max_tokens": self.settings.max_tokens,
                "temperature": self.settings.temperature,
                "messages": [{"role": "user", "content": prompt}]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                provider: PROVIDER.to_string(),
                status,
                body,
            });
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            content: Vec<ContentBlock>,
        }

        let response_text = response.text().await?;
        tracing::debug!(
            provider = PROVIDER,
            "raw completion response: {}",
            preview(&response_text, 1000)
        );

        let api_response: ApiResponse = serde_json::from_str(&response_text)?;
        api_response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| CompletionError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })
    }
}

#[async_trait]
impl TextCompleter for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.call_api(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
