//! Table Concierge HTTP server
//!
//! Reads configuration from the environment (and `.env` if present), builds
//! the completion backend and serves the chat API.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use table_concierge::agentic::create_text_completer;
use table_concierge::{create_chat_router, ChatService, ConciergeConfig, SessionStore, KNOWLEDGE_BASE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "table_concierge=debug,concierge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Table Concierge server");

    let config = ConciergeConfig::from_env().context("invalid configuration")?;
    let completer = create_text_completer(&config.llm).context("failed to create completion backend")?;
    let service = ChatService::new(completer, SessionStore::new(), &KNOWLEDGE_BASE);
    let app = create_chat_router(service);

    let addr = config.server.socket_addr()?;

    tracing::info!("===========================================");
    tracing::info!("  Table Concierge running on http://{}", addr);
    tracing::info!("  Backend: {} ({})", config.llm.backend, config.llm.model);
    tracing::info!("===========================================");
    tracing::info!("  POST   /chat          - Send message");
    tracing::info!("  GET    /session/:id   - Session status");
    tracing::info!("  DELETE /session/:id   - Clear session");
    tracing::info!("  GET    /knowledge     - Knowledge base");
    tracing::info!("  GET    /health        - Health check");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Set SERVER_PORT to another port.",
                    addr.port()
                );
            }
            return Err(e).with_context(|| format!("failed to bind to {}", addr));
        }
    };

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
