//! Capability traits (ports) consumed by the realtime pipeline

mod repositories;

pub use repositories::{EventDirectory, MembershipGate, MessageRepository, PageQuery, RepoResult};
