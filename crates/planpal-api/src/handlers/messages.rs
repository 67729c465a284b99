//! Message handlers
//!
//! REST door into the message pipeline. These delegate to the shared
//! realtime router, so a successful mutation here broadcasts to WebSocket
//! subscribers exactly like its gateway twin.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use planpal_core::{Message, Snowflake};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Request body for creating a message
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Text must be 1-2000 characters"))]
    pub text: String,
}

fn parse_id(raw: &str, what: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {what} format")))
}

/// List messages in an event channel, most recent first
///
/// GET /api/events/{event_id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<String>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<Message>>> {
    let event_id = parse_id(&event_id, "event_id")?;

    let messages = state
        .router()
        .list_messages(auth.user_id, event_id, page)
        .await?;
    Ok(Json(messages))
}

/// Post a message to an event channel
///
/// POST /api/events/{event_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<Message>>> {
    let event_id = parse_id(&event_id, "event_id")?;

    let message = state
        .router()
        .create_message(auth.user_id, event_id, &request.text)
        .await?;
    Ok(Created(Json(message)))
}
