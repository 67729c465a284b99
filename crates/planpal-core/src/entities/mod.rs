//! Domain entities - core business objects

mod membership;
mod message;
mod reaction;

pub use membership::MembershipRole;
pub use message::{Message, MAX_TEXT_LEN};
pub use reaction::{Reaction, MAX_EMOJI_LEN};
