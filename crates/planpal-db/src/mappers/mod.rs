//! Entity ↔ model mappers

mod message;

pub use message::{group_reactions, message_with_reactions};
