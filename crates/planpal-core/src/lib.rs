//! # planpal-core
//!
//! Domain layer for the PlanPal realtime chat core: entities, value objects,
//! and the capability traits the router depends on. This crate has zero
//! dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{MembershipRole, Message, Reaction, MAX_EMOJI_LEN, MAX_TEXT_LEN};
pub use error::DomainError;
pub use traits::{EventDirectory, MembershipGate, MessageRepository, PageQuery, RepoResult};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
