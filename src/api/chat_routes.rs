//! REST API routes for the chat service
//!
//! Chat endpoints:
//! - POST   /chat               - Process one user message
//! - GET    /session/:id        - Get session state
//! - DELETE /session/:id        - Delete session
//!
//! Reference endpoints:
//! - GET    /knowledge          - View the world-knowledge table
//! - GET    /                   - API description
//! - GET    /health             - Health check

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::error::{handle_panic, ApiError};
use crate::chat_service::ChatService;
use crate::intent::Intent;
use crate::knowledge::{KnowledgeBase, KNOWLEDGE_NOTE};
use crate::reservation::ReservationStatus;
use crate::session::DEFAULT_SESSION_ID;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
    pub reservation_status: ReservationStatus,
}

#[derive(Debug, Serialize)]
pub struct SessionInfoResponse {
    pub session_id: String,
    /// Last classified intent, or `"none"` before the first turn
    pub current_intent: String,
    pub reservation_status: ReservationStatus,
    pub message_count: usize,
    pub conversation_length: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ClearSessionResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeResponse {
    pub total_entries: usize,
    #[serde(serialize_with = "serialize_in_table_order")]
    pub knowledge_base: &'static KnowledgeBase,
    pub note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub message: &'static str,
    pub tools: Vec<&'static str>,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub model: String,
    pub active_sessions: usize,
}

fn serialize_in_table_order<S: Serializer>(
    kb: &&'static KnowledgeBase,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(kb.iter())
}

// ============================================================================
// Router
// ============================================================================

pub fn create_chat_router(service: ChatService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/knowledge", get(get_knowledge))
        .route("/health", get(health_check))
        .route("/", get(api_info))
        .with_state(service)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat - Process one user message
async fn chat(
    State(service): State<ChatService>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let session_id = req.session_id.as_deref().unwrap_or(DEFAULT_SESSION_ID);
    let outcome = service.handle_turn(session_id, &req.message).await;

    Json(ChatResponse {
        response: outcome.reply,
        intent: outcome.intent,
        reservation_status: outcome.reservation,
    })
}

/// GET /session/:id - Get session state
async fn get_session(
    State(service): State<ChatService>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfoResponse>, ApiError> {
    let handle = service
        .sessions()
        .get(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    let session = handle.lock().await;

    Ok(Json(SessionInfoResponse {
        session_id: session.id().to_string(),
        current_intent: session
            .last_intent()
            .map_or("none", |intent| intent.as_str())
            .to_string(),
        reservation_status: session.reservation_status(),
        message_count: session.transcript().len(),
        conversation_length: session.conversation_history().len(),
        created_at: session.created_at(),
        updated_at: session.updated_at(),
    }))
}

/// DELETE /session/:id - Delete session
async fn delete_session(
    State(service): State<ChatService>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, ApiError> {
    if !service.sessions().delete(&session_id).await {
        return Err(ApiError::SessionNotFound);
    }
    tracing::info!(session_id = %session_id, "session cleared");
    Ok(Json(ClearSessionResponse {
        message: format!("Session {} cleared", session_id),
    }))
}

/// GET /knowledge - View the world-knowledge table
async fn get_knowledge(State(service): State<ChatService>) -> Json<KnowledgeResponse> {
    let kb = service.knowledge_base();
    Json(KnowledgeResponse {
        total_entries: kb.len(),
        knowledge_base: kb,
        note: KNOWLEDGE_NOTE,
    })
}

/// GET / - API description
async fn api_info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "Multi-Tool Restaurant Chatbot API",
        tools: vec![
            "reservation - Table booking assistance",
            "knowledge - General world knowledge Q&A (off-topic)",
            "gibberish - Handle unclear messages",
            "contradiction - Correct false statements",
            "profanity - Handle inappropriate content",
        ],
        endpoints: BTreeMap::from([
            ("POST /chat", "Send message to chatbot"),
            ("GET /session/{session_id}", "Get session status"),
            ("DELETE /session/{session_id}", "Clear session"),
            ("GET /knowledge", "View knowledge base"),
            ("GET /health", "Service health"),
        ]),
    })
}

/// GET /health - Health check
async fn health_check(State(service): State<ChatService>) -> Json<HealthResponse> {
    let completer = service.completer();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: completer.provider_name().to_string(),
        model: completer.model_name().to_string(),
        active_sessions: service.sessions().len().await,
    })
}
