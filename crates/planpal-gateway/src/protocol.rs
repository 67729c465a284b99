//! Client-to-server action frames
//!
//! Inbound frames mirror the server frame shape: a `type` discriminator and
//! a `data` payload. Channel names never appear on the wire for mutations
//! against an existing message; the server resolves the event channel from
//! the store.

use serde::{Deserialize, Serialize};

use planpal_core::Snowflake;

/// An action requested by a connected client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientAction {
    /// Subscribe to an event channel
    #[serde(rename = "join:event")]
    JoinEvent { event_id: Snowflake },

    /// Unsubscribe from an event channel
    #[serde(rename = "leave:event")]
    LeaveEvent { event_id: Snowflake },

    /// Post a message to an event channel
    #[serde(rename = "message:create")]
    MessageCreate { event_id: Snowflake, text: String },

    /// Edit a message's text
    #[serde(rename = "message:update")]
    MessageUpdate { message_id: Snowflake, text: String },

    /// Delete a message
    #[serde(rename = "message:delete")]
    MessageDelete { message_id: Snowflake },

    /// Set (or replace) the sender's reaction on a message
    #[serde(rename = "message:reaction:set")]
    ReactionSet { message_id: Snowflake, emoji: String },

    /// Clear the sender's reaction from a message
    #[serde(rename = "message:reaction:clear")]
    ReactionClear { message_id: Snowflake },

    /// Signal that the sender is typing in an event channel
    #[serde(rename = "typing")]
    Typing { event_id: Snowflake },
}
