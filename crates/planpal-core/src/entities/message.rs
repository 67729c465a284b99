//! Message entity - a chat message in an event channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Reaction;
use crate::value_objects::Snowflake;

/// Maximum message text length in characters
pub const MAX_TEXT_LEN: usize = 2000;

/// Message entity
///
/// Carries its full reaction set; broadcasts always ship the whole message so
/// every subscriber converges on the same view regardless of delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub event_id: Snowflake,
    pub sender_id: Snowflake,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// Create a new Message with no reactions
    pub fn new(id: Snowflake, event_id: Snowflake, sender_id: Snowflake, text: String) -> Self {
        Self {
            id,
            event_id,
            sender_id,
            text,
            created_at: Utc::now(),
            updated_at: None,
            reactions: Vec::new(),
        }
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Check if message text is empty after trimming
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if a user authored this message
    #[inline]
    pub fn is_sender(&self, user_id: Snowflake) -> bool {
        self.sender_id == user_id
    }

    /// Edit the message text in place
    pub fn edit(&mut self, text: String) {
        self.text = text;
        self.updated_at = Some(Utc::now());
    }

    /// Get the reaction a user placed on this message, if any
    pub fn reaction_by(&self, user_id: Snowflake) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.user_id == user_id)
    }

    /// Apply a reaction, replacing any existing one by the same user.
    ///
    /// At most one reaction per (message, user): a repeat reaction from the
    /// same user overwrites the emoji rather than appending.
    pub fn apply_reaction(&mut self, reaction: Reaction) {
        match self.reactions.iter_mut().find(|r| r.user_id == reaction.user_id) {
            Some(existing) => existing.emoji = reaction.emoji,
            None => self.reactions.push(reaction),
        }
    }

    /// Remove any reaction by the given user; no-op if none exists
    pub fn remove_reaction(&mut self, user_id: Snowflake) {
        self.reactions.retain(|r| r.user_id != user_id);
    }
}
