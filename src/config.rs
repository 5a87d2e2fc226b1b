//! Runtime configuration
//!
//! Everything is read from environment variables (the server binary loads a
//! `.env` file first via `dotenvy`):
//!
//! | Variable          | Default                 |
//! |-------------------|-------------------------|
//! | `AGENT_BACKEND`   | `groq`                  |
//! | `GROQ_API_KEY` / `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` | required for the selected backend |
//! | `LLM_MODEL`       | backend default model   |
//! | `LLM_TEMPERATURE` | `0.0`                   |
//! | `LLM_MAX_TOKENS`  | `500`                   |
//! | `SERVER_HOST`     | `0.0.0.0`               |
//! | `SERVER_PORT`     | `8000`                  |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::agentic::backend::AgentBackend;
use crate::agentic::llm_client::{CompletionSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Top-level configuration for the concierge server
#[derive(Debug, Clone)]
pub struct ConciergeConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Completion backend settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: AgentBackend,
    /// API key for the selected backend, if present in the environment
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ConciergeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = AgentBackend::from_value(lookup("AGENT_BACKEND").as_deref())?;
        let api_key = lookup(backend.api_key_var()).filter(|k| !k.trim().is_empty());
        let model = lookup("LLM_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| backend.default_model().to_string());

        let llm = LlmConfig {
            backend,
            api_key,
            model,
            temperature: parse_var(&lookup, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
        };

        let server = ServerConfig {
            host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
        };

        Ok(Self { server, llm })
    }
}

impl ServerConfig {
    /// Socket address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                var: "SERVER_HOST",
                value: self.host.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl LlmConfig {
    /// Model and sampling parameters for the completion clients
    pub fn settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    var,
                    value: value.clone(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(default),
    }
}
