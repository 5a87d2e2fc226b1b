//! One conversational turn, end to end
//!
//! `handle_turn` ties the pieces together: session lookup, intent
//! classification, dispatch and reply selection. The session lock is held for
//! the whole turn.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use crate::agentic::llm_client::TextCompleter;
use crate::handlers::ResponseHandlers;
use crate::intent::{route, Intent, IntentRouter, Route};
use crate::knowledge::KnowledgeBase;
use crate::reservation::ReservationStatus;
use crate::session::{Session, SessionStore};

/// Reply for a finished turn on a session with no assistant entries
pub const FINISHED_FALLBACK: &str = "I'm here to help!";

/// Result of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub intent: Intent,
    pub reservation: ReservationStatus,
}

/// Chat orchestration over an injected session store and completer
#[derive(Clone)]
pub struct ChatService {
    sessions: SessionStore,
    router: IntentRouter,
    handlers: ResponseHandlers,
    completer: Arc<dyn TextCompleter>,
}

impl ChatService {
    pub fn new(
        completer: Arc<dyn TextCompleter>,
        sessions: SessionStore,
        knowledge: &'static KnowledgeBase,
    ) -> Self {
        Self {
            router: IntentRouter::new(completer.clone()),
            handlers: ResponseHandlers::new(completer.clone(), knowledge),
            sessions,
            completer,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn completer(&self) -> &Arc<dyn TextCompleter> {
        &self.completer
    }

    pub fn knowledge_base(&self) -> &'static KnowledgeBase {
        self.handlers.knowledge_base()
    }

    /// Process one user message for `session_id`
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> TurnOutcome {
        let span = tracing::info_span!("chat_turn", session_id = %session_id);
        async move {
            let handle = self.sessions.get_or_create(session_id).await;
            let mut session = handle.lock().await;
            self.run_turn(&mut session, message).await
        }
        .instrument(span)
        .await
    }

    async fn run_turn(&self, session: &mut Session, message: &str) -> TurnOutcome {
        session.push_user_message(message);

        let topics = self.handlers.knowledge_base().topic_keys();
        let intent = self.router.classify(message, &topics).await;
        session.set_last_intent(intent);

        let next = route(intent, session.is_reservation_complete());
        tracing::info!(intent = %intent, route = ?next, "routing message");

        if let Route::Handler(intent) = next {
            self.handlers.dispatch(intent, session, message).await;
        }

        let reply = session
            .last_assistant_message()
            .unwrap_or(FINISHED_FALLBACK)
            .to_string();
        session.push_history_reply(&reply);

        TurnOutcome {
            reply,
            intent,
            reservation: session.reservation_status(),
        }
    }
}
