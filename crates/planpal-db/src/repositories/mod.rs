//! PostgreSQL repository implementations

mod error;
mod membership;
mod message;

pub use membership::{PgEventDirectory, PgMembershipGate};
pub use message::PgMessageRepository;
