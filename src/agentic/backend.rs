//! Backend Selection
//!
//! Enum for selecting between completion providers (Groq, OpenAI, Anthropic).

use std::str::FromStr;

use crate::error::ConfigError;

/// Completion backend provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBackend {
    /// Groq-hosted Llama models (default)
    #[default]
    Groq,
    /// OpenAI GPT
    OpenAi,
    /// Anthropic Claude
    Anthropic,
}

impl AgentBackend {
    /// Parse an optional `AGENT_BACKEND` value, defaulting to Groq when unset
    pub fn from_value(value: Option<&str>) -> Result<Self, ConfigError> {
        match value {
            Some(v) if !v.trim().is_empty() => v.parse(),
            _ => Ok(Self::default()),
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            AgentBackend::Groq => "Groq",
            AgentBackend::OpenAi => "OpenAI",
            AgentBackend::Anthropic => "Anthropic",
        }
    }

    /// Model used when `LLM_MODEL` is not set
    pub fn default_model(&self) -> &'static str {
        match self {
            AgentBackend::Groq => "llama3-70b-8192",
            AgentBackend::OpenAi => "gpt-4o",
            AgentBackend::Anthropic => "claude-sonnet-4-20250514",
        }
    }

    /// Environment variable holding the provider API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            AgentBackend::Groq => "GROQ_API_KEY",
            AgentBackend::OpenAi => "OPENAI_API_KEY",
            AgentBackend::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for AgentBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" | "llama" => Ok(AgentBackend::Groq),
            "openai" | "gpt" => Ok(AgentBackend::OpenAi),
            "anthropic" | "claude" => Ok(AgentBackend::Anthropic),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl std::fmt::Display for AgentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
