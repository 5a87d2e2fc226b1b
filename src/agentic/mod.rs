//! Completion collaborator
//!
//! Every piece of language understanding (intent classification, reply
//! generation, slot extraction) is delegated to an external LLM behind the
//! [`TextCompleter`] trait.
//!
//! ## Backend Selection
//!
//! Set `AGENT_BACKEND` environment variable:
//! - `groq` (default): Groq-hosted Llama via the OpenAI-compatible API
//! - `openai`: OpenAI API
//! - `anthropic`: Anthropic Claude API

pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod llm_client;
pub mod openai_client;
pub mod prompts;
pub mod scripted_client;

pub use backend::AgentBackend;
pub use client_factory::create_text_completer;
pub use llm_client::{CompletionSettings, TextCompleter};
pub use prompts::PromptKind;
pub use scripted_client::ScriptedCompleter;
