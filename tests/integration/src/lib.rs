//! Shared fixtures for integration tests
//!
//! Provides in-memory implementations of the store, membership gate and
//! event directory so the realtime pipeline can be exercised end to end
//! without external services.

pub mod fixtures;

pub use fixtures::{
    TestPipeline, EVENT_A, EVENT_B, MEMBER_ALICE, MEMBER_BOB, OUTSIDER, VANISHED_EVENT,
};
