//! Capability traits (ports) - define the interfaces for data access
//!
//! The domain layer defines what it needs; the infrastructure layer provides
//! the implementation. The message store is the single writer of message and
//! reaction truth: reaction set/clear are store methods that encapsulate the
//! read-modify-write, so callers never mutate a loaded aggregate and persist
//! it back.

use async_trait::async_trait;

use crate::entities::{MembershipRole, Message};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Stateless offset paging for message listings
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    /// 1-based page number
    pub page: i64,
    /// Page size, clamped to 1..=100 by implementations
    pub per_page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl PageQuery {
    /// Create a page query, normalizing out-of-range values
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Row offset for this page
    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Row limit for this page
    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, 100)
    }
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID, with its reaction set loaded
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// List messages in an event channel, most recent first
    async fn find_by_event(&self, event_id: Snowflake, query: PageQuery)
        -> RepoResult<Vec<Message>>;

    /// Persist a new message (id and timestamps already set by the caller)
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Update message text in place; returns the updated message or `None`
    /// if the message does not exist. Creation order is unchanged.
    async fn edit(&self, id: Snowflake, text: &str) -> RepoResult<Option<Message>>;

    /// Hard-delete a message and all its reactions; returns whether a row
    /// was removed
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Set the user's reaction on a message, replacing any existing reaction
    /// by the same user. Returns the full updated message, or `None` if the
    /// message does not exist.
    ///
    /// Implementations must make the replace atomic: two concurrent calls
    /// from different users must both end up in the final reaction set.
    async fn set_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Option<Message>>;

    /// Remove any reaction by the user (no-op if none exists). Returns the
    /// full updated message, or `None` if the message does not exist.
    async fn clear_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Message>>;
}

// ============================================================================
// Membership Gate (external collaborator, read-only)
// ============================================================================

#[async_trait]
pub trait MembershipGate: Send + Sync {
    /// Role of the user in the group owning the event, or `None` when the
    /// user has no access to the event's channel
    async fn check(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>>;
}

// ============================================================================
// Event Directory (external collaborator, read-only)
// ============================================================================

#[async_trait]
pub trait EventDirectory: Send + Sync {
    /// Whether the event exists
    async fn exists(&self, event_id: Snowflake) -> RepoResult<bool>;
}
