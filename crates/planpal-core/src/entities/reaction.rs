//! Reaction entity - an emoji reaction on a message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum emoji symbol length in bytes (covers multi-codepoint emoji)
pub const MAX_EMOJI_LEN: usize = 32;

/// Reaction entity
///
/// Exists only as part of its owning message and is destroyed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(message_id: Snowflake, user_id: Snowflake, emoji: String) -> Self {
        Self {
            message_id,
            user_id,
            emoji,
            created_at: Utc::now(),
        }
    }

    /// Check whether the emoji symbol is acceptable (non-empty, bounded)
    pub fn emoji_is_valid(emoji: &str) -> bool {
        !emoji.trim().is_empty() && emoji.len() <= MAX_EMOJI_LEN
    }
}
