//! Conversation sessions and the in-memory session store
//!
//! Sessions are created lazily on the first message for an id, seeded with
//! the greeting, and live until explicitly deleted. Nothing is persisted
//! across restarts.
//!
//! Each session sits behind its own async mutex: a turn holds that lock from
//! classification to reply, so concurrent requests for the same id are
//! serialized while different ids proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::intent::Intent;
use crate::reservation::{ReservationSlots, ReservationStatus};

/// Session id used when a request does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

/// Opening assistant message of every session
pub const GREETING: &str = "Hello! I'm your restaurant assistant. I can help you with table reservations, answer questions about our restaurant, or assist with other inquiries. How can I help you today?";

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One transcript line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-id conversation state
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    transcript: Vec<TranscriptEntry>,
    /// User messages and replies interleaved, used as prompt context
    conversation_history: Vec<String>,
    last_intent: Option<Intent>,
    slots: ReservationSlots,
    reservation_complete: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session whose only transcript entry is the greeting
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            transcript: vec![TranscriptEntry {
                role: MessageRole::Assistant,
                content: GREETING.to_string(),
                timestamp: now,
            }],
            conversation_history: Vec::new(),
            last_intent: None,
            slots: ReservationSlots::default(),
            reservation_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn conversation_history(&self) -> &[String] {
        &self.conversation_history
    }

    pub fn last_intent(&self) -> Option<Intent> {
        self.last_intent
    }

    pub fn slots(&self) -> &ReservationSlots {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut ReservationSlots {
        &mut self.slots
    }

    pub fn is_reservation_complete(&self) -> bool {
        self.reservation_complete
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record an incoming user message in transcript and history
    pub fn push_user_message(&mut self, content: &str) {
        self.conversation_history.push(content.to_string());
        self.push_entry(MessageRole::User, content);
    }

    /// Append an assistant reply to the transcript
    pub fn push_assistant_message(&mut self, content: &str) {
        self.push_entry(MessageRole::Assistant, content);
    }

    /// Append the reply returned to the caller to the prompt history
    pub fn push_history_reply(&mut self, content: &str) {
        self.conversation_history.push(content.to_string());
        self.updated_at = Utc::now();
    }

    pub fn set_last_intent(&mut self, intent: Intent) {
        self.last_intent = Some(intent);
    }

    /// Most recent assistant transcript entry
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|entry| entry.role == MessageRole::Assistant)
            .map(|entry| entry.content.as_str())
    }

    /// Flip the reservation to complete.
    ///
    /// Only succeeds while all three slots are filled; once complete the flag
    /// never goes back to false. Returns whether the reservation is complete
    /// after the call.
    pub fn mark_reservation_complete(&mut self) -> bool {
        if self.slots.is_filled() {
            self.reservation_complete = true;
            self.updated_at = Utc::now();
        }
        self.reservation_complete
    }

    /// Snapshot of the slot values and completion flag
    pub fn reservation_status(&self) -> ReservationStatus {
        self.slots.status(self.reservation_complete)
    }

    fn push_entry(&mut self, role: MessageRole, content: &str) {
        let now = Utc::now();
        self.transcript.push(TranscriptEntry {
            role,
            content: content.to_string(),
            timestamp: now,
        });
        self.updated_at = now;
    }
}

/// Shared handle to one session; lock it for the duration of a turn
pub type SessionHandle = Arc<Mutex<Session>>;

/// Thread-safe in-memory session store
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing session, if any
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Existing session, or a freshly seeded one registered under `id`
    pub async fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(handle) = self.get(id).await {
            return handle;
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id = id, "creating session");
                Arc::new(Mutex::new(Session::new(id)))
            })
            .clone()
    }

    /// Remove a session; returns false if it did not exist
    pub async fn delete(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Ids of all live sessions, sorted
    pub async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
