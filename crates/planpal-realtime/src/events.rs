//! Server-to-client event frames
//!
//! These are the frames fanned out to event channel subscribers (and, for
//! `error`, sent privately to the connection that caused it). Mutation
//! frames carry the full committed message so every subscriber converges on
//! the same state regardless of delivery order.

use serde::{Deserialize, Serialize};

use planpal_core::{Message, Snowflake};

/// An event frame pushed to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    /// A new message was posted to the channel
    #[serde(rename = "message:create")]
    MessageCreate(Message),

    /// A message's text was edited
    #[serde(rename = "message:update")]
    MessageUpdate(Message),

    /// A message was deleted
    #[serde(rename = "message:delete")]
    MessageDelete {
        message_id: Snowflake,
        event_id: Snowflake,
    },

    /// A message's reaction set changed (set or clear); carries the whole
    /// updated message
    #[serde(rename = "message:reaction")]
    MessageReaction(Message),

    /// A user is typing in the channel
    #[serde(rename = "typing")]
    Typing {
        event_id: Snowflake,
        user_id: Snowflake,
    },

    /// Private failure notice, delivered only to the origin connection
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Build an error frame from a domain error
    #[must_use]
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
