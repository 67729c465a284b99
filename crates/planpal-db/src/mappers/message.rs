//! Message and Reaction entity <-> model mappers

use std::collections::HashMap;

use planpal_core::{Message, Reaction, Snowflake};

use crate::models::{MessageModel, ReactionModel};

/// Convert MessageModel to Message entity (reactions attached separately)
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            event_id: Snowflake::new(model.event_id),
            sender_id: Snowflake::new(model.sender_id),
            text: model.text,
            created_at: model.created_at,
            updated_at: model.updated_at,
            reactions: Vec::new(),
        }
    }
}

/// Convert ReactionModel to Reaction entity
impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            emoji: model.emoji,
            created_at: model.created_at,
        }
    }
}

/// Assemble a full message from its row and reaction rows
pub fn message_with_reactions(model: MessageModel, reactions: Vec<ReactionModel>) -> Message {
    let mut message = Message::from(model);
    message.reactions = reactions.into_iter().map(Reaction::from).collect();
    message
}

/// Group reaction rows by message id, preserving per-message order
pub fn group_reactions(reactions: Vec<ReactionModel>) -> HashMap<i64, Vec<ReactionModel>> {
    let mut grouped: HashMap<i64, Vec<ReactionModel>> = HashMap::new();
    for reaction in reactions {
        grouped.entry(reaction.message_id).or_default().push(reaction);
    }
    grouped
}
