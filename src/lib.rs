//! Table Concierge - conversational restaurant reservation router
//!
//! Each user message is classified into one of five intents by an LLM and
//! routed to the matching handler. The reservation handler fills three slots
//! (date, time, persons) across turns and asks the guest to confirm once all
//! are known.
//!
//! ## Turn flow
//! Message -> classify -> route -> handler -> reply
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use table_concierge::agentic::{PromptKind, ScriptedCompleter};
//! use table_concierge::{ChatService, SessionStore, KNOWLEDGE_BASE};
//!
//! # async fn demo() {
//! let completer = Arc::new(
//!     ScriptedCompleter::new().otherwise(PromptKind::Classify, "gibberish"),
//! );
//! let service = ChatService::new(completer, SessionStore::new(), &KNOWLEDGE_BASE);
//! let outcome = service.handle_turn("guest-1", "qwzx plk").await;
//! println!("{}", outcome.reply);
//! # }
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// Completion collaborator, backends and prompt templates
pub mod agentic;

// Conversation state
pub mod intent;
pub mod knowledge;
pub mod reservation;
pub mod session;

// Turn handling
pub mod chat_service;
pub mod handlers;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use chat_service::{ChatService, TurnOutcome};
pub use config::ConciergeConfig;
pub use error::{CompletionError, ConfigError, ExtractionError};
pub use intent::Intent;
pub use knowledge::{KnowledgeBase, KNOWLEDGE_BASE};
pub use reservation::{ReservationSlots, ReservationStatus};
pub use session::{Session, SessionStore};

#[cfg(feature = "server")]
pub use api::create_chat_router;
