//! WebSocket handler
//!
//! Authenticates the upgrade, then pumps frames between the socket and the
//! channel registry. All failures after the upgrade are reported as private
//! `error` frames to this connection only; nothing is ever broadcast on an
//! error path.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use planpal_core::{DomainError, Snowflake};
use planpal_realtime::{ConnectionId, ServerEvent};

use crate::protocol::ClientAction;
use crate::server::GatewayState;

/// Query parameters for the upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    token: String,
}

/// WebSocket gateway handler
///
/// Authentication happens before the upgrade: a bad token gets an HTTP 401
/// and no socket.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let user_id = match state
        .jwt()
        .validate_access_token(&params.token)
        .and_then(|claims| claims.user_id())
    {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected gateway upgrade");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, socket, user_id))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket, user_id: Snowflake) {
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.send_buffer());
    let connection = state.router().registry().register(user_id, tx);

    tracing::info!(connection_id = %connection, user_id = %user_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Outbound pump: registry frames -> socket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize outbound frame");
                }
            }
        }
        let _ = ws_sink.close().await;
    });

    // Inbound pump: socket frames -> router
    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_text_frame(&state, connection, user_id, &text).await;
            }
            Ok(Message::Binary(_)) => {
                state.router().registry().send_to(
                    connection,
                    ServerEvent::error("DECODE_ERROR", "Binary frames are not supported"),
                );
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection, "Client closed connection");
                break;
            }
            Err(e) => {
                tracing::warn!(connection_id = %connection, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Same teardown on every exit path: subscriptions die with the socket.
    state.router().disconnect(connection);
    send_task.abort();

    tracing::info!(connection_id = %connection, "WebSocket connection closed");
}

async fn handle_text_frame(
    state: &GatewayState,
    connection: ConnectionId,
    user_id: Snowflake,
    text: &str,
) {
    let action: ClientAction = match serde_json::from_str(text) {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(connection_id = %connection, error = %e, "Unparseable frame");
            state.router().registry().send_to(
                connection,
                ServerEvent::error("DECODE_ERROR", "Could not parse frame"),
            );
            return;
        }
    };

    if let Err(e) = dispatch_action(state, connection, user_id, action).await {
        state
            .router()
            .registry()
            .send_to(connection, error_frame(&e));
    }
}

async fn dispatch_action(
    state: &GatewayState,
    connection: ConnectionId,
    user_id: Snowflake,
    action: ClientAction,
) -> Result<(), DomainError> {
    let router = state.router();

    match action {
        ClientAction::JoinEvent { event_id } => {
            router.join(connection, user_id, event_id).await?;
        }
        ClientAction::LeaveEvent { event_id } => {
            router.leave(connection, event_id);
        }
        ClientAction::MessageCreate { event_id, text } => {
            router.create_message(user_id, event_id, &text).await?;
        }
        ClientAction::MessageUpdate { message_id, text } => {
            router.update_message(user_id, message_id, &text).await?;
        }
        ClientAction::MessageDelete { message_id } => {
            router.delete_message(user_id, message_id).await?;
        }
        ClientAction::ReactionSet { message_id, emoji } => {
            router.set_reaction(user_id, message_id, &emoji).await?;
        }
        ClientAction::ReactionClear { message_id } => {
            router.clear_reaction(user_id, message_id).await?;
        }
        ClientAction::Typing { event_id } => {
            router.typing(connection, user_id, event_id).await?;
        }
    }

    Ok(())
}

/// Build a private error frame, hiding infrastructure details from clients
fn error_frame(e: &DomainError) -> ServerEvent {
    let message = match e {
        DomainError::DatabaseError(_) | DomainError::InternalError(_) => {
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    ServerEvent::error(e.code(), message)
}
