//! Client Factory
//!
//! Builds the configured [`TextCompleter`] backend.

use std::sync::Arc;

use super::anthropic_client::AnthropicClient;
use super::backend::AgentBackend;
use super::llm_client::TextCompleter;
use super::openai_client::OpenAiClient;
use crate::config::LlmConfig;
use crate::error::CompletionError;

/// Create the completion client selected by `config.backend`
///
/// Fails with [`CompletionError::MissingApiKey`] when the backend's key
/// variable was not set.
pub fn create_text_completer(
    config: &LlmConfig,
) -> Result<Arc<dyn TextCompleter>, CompletionError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or(CompletionError::MissingApiKey {
            var: config.backend.api_key_var(),
        })?;
    let settings = config.settings();

    let client: Arc<dyn TextCompleter> = match config.backend {
        AgentBackend::Groq => Arc::new(OpenAiClient::groq(api_key, settings)),
        AgentBackend::OpenAi => Arc::new(OpenAiClient::openai(api_key, settings)),
        AgentBackend::Anthropic => Arc::new(AnthropicClient::new(api_key, settings)),
    };

    tracing::info!(
        provider = client.provider_name(),
        model = client.model_name(),
        "completion backend ready"
    );
    Ok(client)
}
