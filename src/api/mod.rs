//! REST API for the restaurant concierge
//!
//! Only built with the `server` feature.

pub mod chat_routes;
pub mod error;

pub use chat_routes::create_chat_router;
pub use error::ApiError;
