//! Text Completer Trait
//!
//! Unified interface for the completion collaborator (Groq, OpenAI, Anthropic,
//! or a scripted fake in tests).

use async_trait::async_trait;

use crate::error::CompletionError;

/// Default sampling temperature for every request
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Default completion budget per request
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Model and sampling parameters shared by the HTTP backends
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionSettings {
    /// Settings for a model with the default temperature and token budget
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Single-prompt completion capability
///
/// Implementations return the trimmed completion text, or a typed error the
/// caller maps to its own fallback reply.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    /// Send one user prompt, return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}

/// Char-boundary-safe prefix of `text` for debug logging
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
