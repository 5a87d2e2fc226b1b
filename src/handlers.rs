//! Per-intent response handlers
//!
//! Every handler appends exactly one assistant entry to the transcript.
//! Completion failures never escape a handler; each one substitutes its own
//! fixed fallback reply.

use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::agentic::llm_client::TextCompleter;
use crate::agentic::prompts;
use crate::intent::Intent;
use crate::knowledge::KnowledgeBase;
use crate::reservation::ReservationTracker;
use crate::session::Session;

pub const KNOWLEDGE_FALLBACK: &str = "Sorry, I can't look that up right now. I'd be happy to help you with a table reservation in the meantime.";

pub const GIBBERISH_REPLY: &str = "I’m sorry, I didn’t catch that—could you rephrase?";

pub const CONTRADICTION_FALLBACK: &str =
    "That doesn't sound quite right. Let's get back to your table reservation. How can I help?";

pub const PROFANITY_REPLIES: [&str; 4] = [
    "Let's keep our conversation respectful, please. I'm here to help with your restaurant needs.",
    "I'd appreciate if we could maintain a polite conversation. How can I assist you with our restaurant services?",
    "Let's focus on how I can help you today. I can assist with reservations or answer questions about our restaurant.",
    "I'm here to provide helpful service. Please let me know how I can assist you with restaurant-related questions.",
];

/// The five handlers behind one dispatch point
#[derive(Clone)]
pub struct ResponseHandlers {
    completer: Arc<dyn TextCompleter>,
    reservations: ReservationTracker,
    knowledge: &'static KnowledgeBase,
}

impl ResponseHandlers {
    pub fn new(completer: Arc<dyn TextCompleter>, knowledge: &'static KnowledgeBase) -> Self {
        Self {
            reservations: ReservationTracker::new(completer.clone()),
            completer,
            knowledge,
        }
    }

    pub fn knowledge_base(&self) -> &'static KnowledgeBase {
        self.knowledge
    }

    /// Run the handler for `intent` and record its reply on the transcript
    pub async fn dispatch(&self, intent: Intent, session: &mut Session, user_message: &str) {
        let reply = match intent {
            Intent::Reservation => self.reservations.handle(session, user_message).await,
            Intent::Knowledge => self.knowledge(user_message).await,
            Intent::Gibberish => GIBBERISH_REPLY.to_string(),
            Intent::Contradiction => self.contradiction(user_message).await,
            Intent::Profanity => pick_profanity_reply().to_string(),
        };
        tracing::debug!(session_id = session.id(), intent = %intent, "handler replied");
        session.push_assistant_message(&reply);
    }

    async fn knowledge(&self, user_message: &str) -> String {
        let prompt = prompts::knowledge_prompt(user_message, &self.knowledge.render_for_prompt());
        self.complete_or(&prompt, KNOWLEDGE_FALLBACK, "knowledge").await
    }

    async fn contradiction(&self, user_message: &str) -> String {
        let prompt = prompts::contradiction_prompt(user_message);
        self.complete_or(&prompt, CONTRADICTION_FALLBACK, "contradiction")
            .await
    }

    async fn complete_or(&self, prompt: &str, fallback: &str, handler: &str) -> String {
        match self.completer.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(handler, "Completion failed, using fallback reply: {}", e);
                fallback.to_string()
            }
        }
    }
}

// Kept synchronous: the thread-local rng must not live across an await.
fn pick_profanity_reply() -> &'static str {
    PROFANITY_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PROFANITY_REPLIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentic::{PromptKind, ScriptedCompleter};
    use crate::knowledge::KNOWLEDGE_BASE;
    use crate::session::MessageRole;

    fn handlers(completer: ScriptedCompleter) -> (ResponseHandlers, Arc<ScriptedCompleter>) {
        let completer = Arc::new(completer);
        (
            ResponseHandlers::new(completer.clone(), &KNOWLEDGE_BASE),
            completer,
        )
    }

    fn last_reply(session: &Session) -> &str {
        let entry = session.transcript().last().unwrap();
        assert_eq!(entry.role, MessageRole::Assistant);
        &entry.content
    }

    #[tokio::test]
    async fn test_knowledge_inlines_fact_table() {
        let (handlers, completer) = handlers(
            ScriptedCompleter::new().reply(PromptKind::Knowledge, "Canberra. Shall we book a table?"),
        );
        let mut session = Session::new("k");
        handlers
            .dispatch(Intent::Knowledge, &mut session, "Capital of Australia?")
            .await;

        assert_eq!(last_reply(&session), "Canberra. Shall we book a table?");
        let prompt = &completer.calls()[0];
        assert!(prompt.contains("- Capital Australia: The capital of Australia is Canberra"));
        assert!(prompt.contains("Capital of Australia?"));
    }

    #[tokio::test]
    async fn test_knowledge_failure_uses_fallback() {
        let (handlers, _) = handlers(ScriptedCompleter::new().fail(PromptKind::Knowledge, "down"));
        let mut session = Session::new("k");
        handlers
            .dispatch(Intent::Knowledge, &mut session, "How tall is Everest?")
            .await;
        assert_eq!(last_reply(&session), KNOWLEDGE_FALLBACK);
    }

    #[tokio::test]
    async fn test_gibberish_needs_no_completion() {
        let (handlers, completer) = handlers(ScriptedCompleter::new());
        let mut session = Session::new("g");
        handlers
            .dispatch(Intent::Gibberish, &mut session, "asdf qwer")
            .await;
        assert_eq!(last_reply(&session), GIBBERISH_REPLY);
        assert!(completer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_contradiction_reply_and_fallback() {
        let (handlers, _) = handlers(
            ScriptedCompleter::new()
                .reply(PromptKind::Contradiction, "Ice is cold. Shall we continue your booking?")
                .fail(PromptKind::Contradiction, "down"),
        );
        let mut session = Session::new("c");
        handlers
            .dispatch(Intent::Contradiction, &mut session, "Ice is hot")
            .await;
        assert_eq!(
            last_reply(&session),
            "Ice is cold. Shall we continue your booking?"
        );

        handlers
            .dispatch(Intent::Contradiction, &mut session, "The sun is cold")
            .await;
        assert_eq!(last_reply(&session), CONTRADICTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_profanity_picks_a_fixed_reply() {
        let (handlers, completer) = handlers(ScriptedCompleter::new());
        let mut session = Session::new("p");
        for _ in 0..8 {
            handlers
                .dispatch(Intent::Profanity, &mut session, "you're stupid")
                .await;
            let reply = last_reply(&session);
            assert!(PROFANITY_REPLIES.iter().any(|candidate| *candidate == reply));
        }
        assert!(completer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reservation_dispatch_appends_one_entry() {
        let (handlers, _) = handlers(
            ScriptedCompleter::new()
                .reply(PromptKind::Reservation, "For how many people?")
                .reply(PromptKind::Extract, r#"{"date": "Friday", "time": null, "persons": null}"#),
        );
        let mut session = Session::new("r");
        handlers
            .dispatch(Intent::Reservation, &mut session, "Friday please")
            .await;
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(last_reply(&session), "For how many people?");
        assert_eq!(session.slots().date(), Some("Friday"));
    }
}
