//! Route definitions
//!
//! All REST routes mounted under /api, matching the gateway's event names
//! one-to-one where an operation has both doors.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, messages, reactions};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

/// /api routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/:event_id/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/messages/:message_id/reaction",
            post(reactions::set_reaction).delete(reactions::clear_reaction),
        )
}
