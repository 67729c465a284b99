//! Message and reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub event_id: i64,
    pub sender_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MessageModel {
    /// Check if the message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Database model for the message_reactions table
///
/// `(message_id, user_id)` is the primary key, which is what makes the
/// reaction upsert a replace rather than an append.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub message_id: i64,
    pub user_id: i64,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

/// Row shape for membership role lookups
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub role: String,
}
