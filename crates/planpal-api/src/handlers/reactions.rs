//! Reaction handlers
//!
//! Setting a reaction replaces any previous reaction by the same user;
//! clearing one that does not exist is a successful no-op. Both return the
//! full updated message so the client reconciles to canonical state.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use planpal_core::{Message, Snowflake};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for setting a reaction
#[derive(Debug, Deserialize, Validate)]
pub struct SetReactionRequest {
    #[validate(length(min = 1, max = 32, message = "Emoji must be 1-32 bytes"))]
    pub emoji: String,
}

fn parse_message_id(raw: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))
}

/// Set (or replace) the caller's reaction on a message
///
/// POST /api/messages/{message_id}/reaction
pub async fn set_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetReactionRequest>,
) -> ApiResult<Json<Message>> {
    let message_id = parse_message_id(&message_id)?;

    let message = state
        .router()
        .set_reaction(auth.user_id, message_id, &request.emoji)
        .await?;
    Ok(Json(message))
}

/// Clear the caller's reaction from a message
///
/// DELETE /api/messages/{message_id}/reaction
pub async fn clear_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Message>> {
    let message_id = parse_message_id(&message_id)?;

    let message = state
        .router()
        .clear_reaction(auth.user_id, message_id)
        .await?;
    Ok(Json(message))
}
