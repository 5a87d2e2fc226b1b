//! Error types for the concierge
//!
//! Every failure here degrades a single turn; none of them is fatal to the
//! process. Collaborator failures are surfaced as [`CompletionError`] so the
//! turn-handling layer picks the user-facing fallback explicitly.

use thiserror::Error;

/// Failure of a single call to the completion collaborator
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("{var} environment variable not set")]
    MissingApiKey { var: &'static str },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} returned no completion text")]
    EmptyResponse { provider: String },

    #[error("Failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reservation slot extraction could not be parsed from the LLM reply.
///
/// These are logged and discarded; prior slot values stay untouched.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no JSON object found in extraction reply")]
    NoJsonObject,

    #[error("extraction reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("extraction reply is not a JSON object")]
    NotAnObject,
}

/// Invalid configuration value read from the environment
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown AGENT_BACKEND '{0}'. Valid values: groq, llama, openai, gpt, anthropic, claude")]
    UnknownBackend(String),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
