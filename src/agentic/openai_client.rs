//! OpenAI-compatible Client
//!
//! Completion client for chat-completions endpoints. Groq exposes the same
//! wire format as OpenAI, so both backends share this implementation.

use async_trait::async_trait;
use serde::Deserialize;

use super::backend::AgentBackend;
use super::llm_client::{preview, CompletionSettings, TextCompleter};
use crate::error::CompletionError;

/// Groq chat-completions endpoint
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// OpenAI chat-completions endpoint
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Chat-completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    provider: &'static str,
    settings: CompletionSettings,
}

impl OpenAiClient {
    /// Client for Groq with the given API key and settings
    pub fn groq(api_key: String, settings: CompletionSettings) -> Self {
        Self::with_endpoint(api_key, GROQ_ENDPOINT, AgentBackend::Groq.name(), settings)
    }

    /// Client for OpenAI with the given API key and settings
    pub fn openai(api_key: String, settings: CompletionSettings) -> Self {
        Self::with_endpoint(
            api_key,
            OPENAI_ENDPOINT,
            AgentBackend::OpenAi.name(),
            settings,
        )
    }

    /// Client for any OpenAI-compatible endpoint
    pub fn with_endpoint(
        api_key: String,
        endpoint: &str,
        provider: &'static str,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            provider,
            settings,
        }
    }

    /// Internal API call implementation
    async fn call_api(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": &self.settings.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_tokens
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                provider: self.provider.to_string(),
                status,
                body,
            });
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let response_text = response.text().await?;
        tracing::debug!(
            provider = self.provider,
            "raw completion response: {}",
            preview(&response_text, 1000)
        );

        let api_response: ApiResponse = serde_json::from_str(&response_text)?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| CompletionError::EmptyResponse {
                provider: self.provider.to_string(),
            })
    }
}

#[async_trait]
impl TextCompleter for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.call_api(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }

    fn provider_name(&self) -> &str {
        self.provider
    }
}
