//! Reservation slot tracking
//!
//! Slot values (date, time, persons) are opaque display strings produced by
//! the LLM; nothing is normalized to a calendar date or an integer. A turn on
//! the reservation path runs:
//!
//! 1. one conversational call, which doubles as the confirmation check: with
//!    all slots filled, a reply of exactly `YES` completes the reservation and
//!    ends the turn,
//! 2. one extraction call whose JSON reply overwrites slots last-write-wins
//!    (failures keep every prior value),
//! 3. a completion re-check that swaps the reply for the confirmation request
//!    once all three slots are known.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agentic::llm_client::TextCompleter;
use crate::agentic::prompts;
use crate::error::ExtractionError;
use crate::session::Session;

/// Reply that means "the guest confirmed the details"
pub const CONFIRMATION_TOKEN: &str = "YES";

/// Reply once the reservation is confirmed
pub const CLOSING_MESSAGE: &str =
    "Thanks for confirmation, The table will be reserved for you. See you soon.";

/// Reply when the conversational call fails
pub const RESERVATION_FALLBACK: &str = "Sorry, I'm having trouble processing your reservation right now. Could you please repeat that?";

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static JSON object pattern"));

static PYTHON_NONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(:\s*)None\b").expect("static None literal pattern"));

/// The three values a booking needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationSlots {
    date: Option<String>,
    time: Option<String>,
    persons: Option<String>,
}

impl ReservationSlots {
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn persons(&self) -> Option<&str> {
        self.persons.as_deref()
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = Some(date.into());
    }

    pub fn set_time(&mut self, time: impl Into<String>) {
        self.time = Some(time.into());
    }

    pub fn set_persons(&mut self, persons: impl Into<String>) {
        self.persons = Some(persons.into());
    }

    /// All three slots have a value
    pub fn is_filled(&self) -> bool {
        self.date.is_some() && self.time.is_some() && self.persons.is_some()
    }

    /// Overwrite every slot the extraction produced a value for.
    ///
    /// Slots are never cleared. Returns true if any slot changed.
    pub fn apply(&mut self, extracted: &ExtractedSlots) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut self.date, &extracted.date),
            (&mut self.time, &extracted.time),
            (&mut self.persons, &extracted.persons),
        ] {
            if let Some(value) = value {
                if slot.as_ref() != Some(value) {
                    *slot = Some(value.clone());
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn status(&self, complete: bool) -> ReservationStatus {
        ReservationStatus {
            date: self.date.clone(),
            time: self.time.clone(),
            persons: self.persons.clone(),
            complete,
        }
    }
}

/// Reservation state as reported to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStatus {
    pub date: Option<String>,
    pub time: Option<String>,
    pub persons: Option<String>,
    pub complete: bool,
}

/// Slot values found in one user message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSlots {
    pub date: Option<String>,
    pub time: Option<String>,
    pub persons: Option<String>,
}

impl ExtractedSlots {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.persons.is_none()
    }
}

/// Parse the extraction reply.
///
/// Takes the outermost `{...}` span (the reply may wrap it in prose or code
/// fences), reads `None` literals as `null`, and keeps only non-empty string
/// or numeric fields.
pub fn parse_extraction(raw: &str) -> Result<ExtractedSlots, ExtractionError> {
    let blob = JSON_OBJECT
        .find(raw)
        .ok_or(ExtractionError::NoJsonObject)?
        .as_str();
    let blob = PYTHON_NONE.replace_all(blob, "${1}null");

    let value: Value = serde_json::from_str(&blob)?;
    let object = value.as_object().ok_or(ExtractionError::NotAnObject)?;

    Ok(ExtractedSlots {
        date: slot_value(object.get("date")),
        time: slot_value(object.get("time")),
        persons: slot_value(object.get("persons")),
    })
}

fn slot_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            let is_null_word = s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none");
            (!s.is_empty() && !is_null_word).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reply asking the guest to confirm the collected details
pub fn confirmation_request(slots: &ReservationSlots) -> String {
    format!(
        "Reservation details:\nDate: {},\nTime: {},\nPersons: {}\n\nPlease respond with \"yes please confirm\" or let me know for any change.",
        slots.date().unwrap_or_default(),
        slots.time().unwrap_or_default(),
        slots.persons().unwrap_or_default(),
    )
}

/// Reservation handler: conversational reply, slot extraction, completion
#[derive(Clone)]
pub struct ReservationTracker {
    completer: Arc<dyn TextCompleter>,
}

impl ReservationTracker {
    pub fn new(completer: Arc<dyn TextCompleter>) -> Self {
        Self { completer }
    }

    /// Run one reservation turn against `session`, returning the reply
    pub async fn handle(&self, session: &mut Session, user_message: &str) -> String {
        let prompt = prompts::reservation_prompt(
            user_message,
            session.slots(),
            session.conversation_history(),
        );
        let reply = match self.completer.complete(&prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(session_id = session.id(), "Reservation reply failed: {}", e);
                None
            }
        };

        let confirmed = reply.as_deref().map(str::trim) == Some(CONFIRMATION_TOKEN);
        if confirmed && session.mark_reservation_complete() {
            tracing::info!(
                session_id = session.id(),
                status = ?session.reservation_status(),
                "reservation confirmed"
            );
            return CLOSING_MESSAGE.to_string();
        }

        let mut response = reply.unwrap_or_else(|| RESERVATION_FALLBACK.to_string());

        if let Some(extracted) = self.extract(session.id(), user_message).await {
            if session.slots_mut().apply(&extracted) {
                tracing::info!(
                    session_id = session.id(),
                    slots = ?session.slots(),
                    "reservation slots updated"
                );
            }
        }

        if session.slots().is_filled() {
            response = confirmation_request(session.slots());
        }
        response
    }

    /// Ask the collaborator for slot values; `None` on any failure
    async fn extract(&self, session_id: &str, user_message: &str) -> Option<ExtractedSlots> {
        let raw = match self
            .completer
            .complete(&prompts::extraction_prompt(user_message))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(session_id, "Slot extraction call failed: {}", e);
                return None;
            }
        };

        match parse_extraction(&raw) {
            Ok(extracted) => {
                tracing::debug!(session_id, extracted = ?extracted, "extracted slots");
                Some(extracted)
            }
            Err(e) => {
                tracing::debug!(session_id, raw = %raw, "Discarding extraction reply: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentic::{PromptKind, ScriptedCompleter};

    fn filled_slots() -> ReservationSlots {
        let mut slots = ReservationSlots::default();
        slots.set_date("Friday");
        slots.set_time("7 pm");
        slots.set_persons("4");
        slots
    }

    #[test]
    fn test_parse_plain_object() {
        let extracted =
            parse_extraction(r#"{"date": null, "time": "12 pm", "persons": "2"}"#).unwrap();
        assert_eq!(
            extracted,
            ExtractedSlots {
                date: None,
                time: Some("12 pm".to_string()),
                persons: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_object_inside_prose_and_fences() {
        let raw = "Here you go:\n```json\n{\n  \"date\": \"Monday\",\n  \"time\": null,\n  \"persons\": null\n}\n```";
        let extracted = parse_extraction(raw).unwrap();
        assert_eq!(extracted.date.as_deref(), Some("Monday"));
        assert!(extracted.time.is_none());
    }

    #[test]
    fn test_parse_python_none_literals() {
        let extracted =
            parse_extraction(r#"{"date": None, "time": "12 pm", "persons": "2"}"#).unwrap();
        assert_eq!(extracted.date, None);
        assert_eq!(extracted.time.as_deref(), Some("12 pm"));
    }

    #[test]
    fn test_parse_numeric_and_empty_fields() {
        let extracted =
            parse_extraction(r#"{"date": "", "time": "null", "persons": 3}"#).unwrap();
        assert_eq!(
            extracted,
            ExtractedSlots {
                date: None,
                time: None,
                persons: Some("3".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_extraction("no json here"),
            Err(ExtractionError::NoJsonObject)
        ));
        assert!(matches!(
            parse_extraction("{date: Monday}"),
            Err(ExtractionError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_apply_is_last_write_wins_and_never_clears() {
        let mut slots = ReservationSlots::default();
        slots.set_date("Monday");

        let changed = slots.apply(&ExtractedSlots {
            date: None,
            time: Some("12 pm".to_string()),
            persons: Some("2".to_string()),
        });
        assert!(changed);
        assert_eq!(slots.date(), Some("Monday"));
        assert_eq!(slots.time(), Some("12 pm"));

        assert!(!slots.apply(&ExtractedSlots::default()));
        assert_eq!(slots.persons(), Some("2"));

        assert!(slots.apply(&ExtractedSlots {
            date: Some("Tuesday".to_string()),
            ..Default::default()
        }));
        assert_eq!(slots.date(), Some("Tuesday"));
    }

    #[test]
    fn test_confirmation_request_lists_values() {
        assert_eq!(
            confirmation_request(&filled_slots()),
            "Reservation details:\nDate: Friday,\nTime: 7 pm,\nPersons: 4\n\nPlease respond with \"yes please confirm\" or let me know for any change."
        );
    }

    #[tokio::test]
    async fn test_partial_turn_keeps_conversational_reply() {
        let completer = Arc::new(
            ScriptedCompleter::new()
                .reply(PromptKind::Reservation, "Great, what time and for how many?")
                .reply(
                    PromptKind::Extract,
                    r#"{"date": "Monday", "time": null, "persons": null}"#,
                ),
        );
        let tracker = ReservationTracker::new(completer);
        let mut session = Session::new("t");

        let reply = tracker.handle(&mut session, "Book on this Monday").await;
        assert_eq!(reply, "Great, what time and for how many?");
        assert_eq!(session.slots().date(), Some("Monday"));
        assert!(!session.is_reservation_complete());
    }

    #[tokio::test]
    async fn test_ambiguous_extraction_changes_nothing() {
        let completer = Arc::new(
            ScriptedCompleter::new()
                .reply(PromptKind::Reservation, "Monday or Tuesday?")
                .reply(
                    PromptKind::Extract,
                    r#"{"date": null, "time": null, "persons": null}"#,
                ),
        );
        let tracker = ReservationTracker::new(completer);
        let mut session = Session::new("t");
        session.slots_mut().set_persons("2");

        tracker
            .handle(&mut session, "Book on this Monday or Tuesday")
            .await;
        assert_eq!(session.slots().date(), None);
        assert_eq!(session.slots().time(), None);
        assert_eq!(session.slots().persons(), Some("2"));
    }

    #[tokio::test]
    async fn test_filling_last_slot_asks_for_confirmation() {
        let completer = Arc::new(
            ScriptedCompleter::new()
                .reply(PromptKind::Reservation, "Noted!")
                .reply(
                    PromptKind::Extract,
                    r#"{"date": null, "time": null, "persons": "4"}"#,
                ),
        );
        let tracker = ReservationTracker::new(completer);
        let mut session = Session::new("t");
        session.slots_mut().set_date("Friday");
        session.slots_mut().set_time("7 pm");

        let reply = tracker.handle(&mut session, "We are four").await;
        assert_eq!(reply, confirmation_request(&filled_slots()));
        assert!(!session.is_reservation_complete());
    }

    #[tokio::test]
    async fn test_yes_with_filled_slots_completes_without_extraction() {
        let completer = Arc::new(ScriptedCompleter::new().reply(PromptKind::Reservation, "YES"));
        let tracker = ReservationTracker::new(completer.clone());
        let mut session = Session::new("t");
        *session.slots_mut() = filled_slots();

        let reply = tracker.handle(&mut session, "yes please confirm").await;
        assert_eq!(reply, CLOSING_MESSAGE);
        assert!(session.is_reservation_complete());
        assert_eq!(completer.call_count(PromptKind::Extract), 0);
    }

    #[tokio::test]
    async fn test_yes_with_missing_slots_does_not_complete() {
        let completer = Arc::new(
            ScriptedCompleter::new()
                .reply(PromptKind::Reservation, "YES")
                .reply(PromptKind::Extract, r#"{"date": null, "time": null, "persons": null}"#),
        );
        let tracker = ReservationTracker::new(completer);
        let mut session = Session::new("t");
        session.slots_mut().set_date("Friday");

        let reply = tracker.handle(&mut session, "yes").await;
        assert_eq!(reply, "YES");
        assert!(!session.is_reservation_complete());
    }

    #[tokio::test]
    async fn test_collaborator_failures_keep_state() {
        let completer = Arc::new(
            ScriptedCompleter::new()
                .fail(PromptKind::Reservation, "timeout")
                .reply(PromptKind::Extract, "I could not find anything"),
        );
        let tracker = ReservationTracker::new(completer);
        let mut session = Session::new("t");
        session.slots_mut().set_date("Friday");

        let reply = tracker.handle(&mut session, "hmm").await;
        assert_eq!(reply, RESERVATION_FALLBACK);
        assert_eq!(session.slots().date(), Some("Friday"));
        assert_eq!(session.slots().time(), None);
    }
}
