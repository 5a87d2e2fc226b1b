//! Intent classification and turn routing
//!
//! A message is classified into exactly one [`Intent`] by a single completion
//! call. Anything the collaborator returns outside the five labels, and any
//! collaborator failure, resolves to [`Intent::Reservation`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agentic::llm_client::TextCompleter;
use crate::agentic::prompts;

/// What the user is trying to do with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Booking a table, giving slot values, confirming, or greeting
    #[default]
    Reservation,
    /// Off-topic world-knowledge question
    Knowledge,
    /// Incomprehensible input
    Gibberish,
    /// False or self-contradictory statement
    Contradiction,
    /// Rude or offensive input
    Profanity,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Reservation,
        Intent::Knowledge,
        Intent::Gibberish,
        Intent::Contradiction,
        Intent::Profanity,
    ];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Reservation => "reservation",
            Intent::Knowledge => "knowledge",
            Intent::Gibberish => "gibberish",
            Intent::Contradiction => "contradiction",
            Intent::Profanity => "profanity",
        }
    }

    /// Parse raw classifier output, falling back to `Reservation`
    ///
    /// The text is trimmed and lower-cased first; empty, multi-word or
    /// unknown output all take the fallback.
    pub fn parse_or_default(raw: &str) -> Intent {
        raw.trim().to_lowercase().parse().unwrap_or_default()
    }
}

/// Label outside the five known intents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent label '{0}'")]
pub struct ParseIntentError(pub String);

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| ParseIntentError(s.to_string()))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a classified turn goes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Reservation already complete and the user is still on reservations:
    /// the turn ends without running a handler
    Finished,
    /// Run the handler for this intent
    Handler(Intent),
}

/// Pick the handler for a turn
pub fn route(intent: Intent, reservation_complete: bool) -> Route {
    if reservation_complete && intent == Intent::Reservation {
        Route::Finished
    } else {
        Route::Handler(intent)
    }
}

/// Single-call intent classifier
#[derive(Clone)]
pub struct IntentRouter {
    completer: Arc<dyn TextCompleter>,
}

impl IntentRouter {
    pub fn new(completer: Arc<dyn TextCompleter>) -> Self {
        Self { completer }
    }

    /// Classify `user_text`; never fails
    pub async fn classify(&self, user_text: &str, kb_topic_keys: &[&str]) -> Intent {
        let prompt = prompts::classification_prompt(user_text, kb_topic_keys);
        match self.completer.complete(&prompt).await {
            Ok(raw) => {
                let intent = Intent::parse_or_default(&raw);
                tracing::debug!(raw = %raw, intent = %intent, "classified message");
                intent
            }
            Err(e) => {
                tracing::warn!(
                    "Intent classification failed, defaulting to {}: {}",
                    Intent::default(),
                    e
                );
                Intent::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentic::{PromptKind, ScriptedCompleter};

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(Intent::parse_or_default("knowledge"), Intent::Knowledge);
        assert_eq!(Intent::parse_or_default("  Profanity \n"), Intent::Profanity);
        assert_eq!(Intent::parse_or_default("GIBBERISH"), Intent::Gibberish);
        assert_eq!(
            "contradiction".parse::<Intent>().unwrap(),
            Intent::Contradiction
        );
    }

    #[test]
    fn test_unknown_labels_fall_back_to_reservation() {
        assert_eq!(Intent::parse_or_default(""), Intent::Reservation);
        assert_eq!(
            Intent::parse_or_default("knowledge question"),
            Intent::Reservation
        );
        assert_eq!(
            Intent::parse_or_default("Error getting LLM response: timeout"),
            Intent::Reservation
        );
        assert_eq!(
            "weather".parse::<Intent>(),
            Err(ParseIntentError("weather".to_string()))
        );
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(
            serde_json::to_string(&Intent::Knowledge).unwrap(),
            "\"knowledge\""
        );
        assert_eq!(Intent::Gibberish.to_string(), "gibberish");
    }

    #[test]
    fn test_route() {
        assert_eq!(route(Intent::Reservation, true), Route::Finished);
        assert_eq!(
            route(Intent::Reservation, false),
            Route::Handler(Intent::Reservation)
        );
        for intent in [
            Intent::Knowledge,
            Intent::Gibberish,
            Intent::Contradiction,
            Intent::Profanity,
        ] {
            assert_eq!(route(intent, true), Route::Handler(intent));
            assert_eq!(route(intent, false), Route::Handler(intent));
        }
    }

    #[tokio::test]
    async fn test_classify_uses_completer_output() {
        let completer = Arc::new(ScriptedCompleter::new().reply(PromptKind::Classify, "Knowledge"));
        let router = IntentRouter::new(completer.clone());
        let intent = router
            .classify("How fast is light?", &["speed_of_light"])
            .await;
        assert_eq!(intent, Intent::Knowledge);
        assert!(completer.calls()[0].contains("speed_of_light"));
    }

    #[tokio::test]
    async fn test_classify_failure_routes_to_reservation() {
        let completer = Arc::new(ScriptedCompleter::new().fail(PromptKind::Classify, "401 invalid key"));
        let router = IntentRouter::new(completer);
        assert_eq!(router.classify("asdf qwer", &[]).await, Intent::Reservation);
    }

    #[tokio::test]
    async fn test_classify_empty_output_routes_to_reservation() {
        let completer = Arc::new(ScriptedCompleter::new().reply(PromptKind::Classify, ""));
        let router = IntentRouter::new(completer);
        assert_eq!(router.classify("hmm", &[]).await, Intent::Reservation);
    }
}
