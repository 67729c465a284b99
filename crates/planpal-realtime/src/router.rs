//! Realtime router
//!
//! The single pipeline every message operation goes through, whether it
//! arrives over REST or over the WebSocket gateway: authorize against the
//! membership gate, mutate the store, then broadcast the committed state to
//! the event channel's subscribers. REST callers pass `None` for the origin
//! connection; gateway callers pass their own so typing can exclude it.
//!
//! Broadcast scope always comes from the event id the store has recorded
//! for the message, never from a client-supplied channel name.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::instrument;

use planpal_core::{
    DomainError, EventDirectory, MembershipGate, MembershipRole, Message, MessageRepository,
    PageQuery, Reaction, RepoResult, Snowflake, SnowflakeGenerator, MAX_TEXT_LEN,
};

use crate::events::ServerEvent;
use crate::registry::{ChannelRegistry, ConnectionId};

/// Router tuning knobs
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Budget for membership gate and event directory lookups; exceeding it
    /// fails the operation as transient rather than hanging the pipeline
    pub lookup_timeout: Duration,
    /// Worker id baked into generated snowflakes (must be unique per node)
    pub worker_id: u16,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            worker_id: 0,
        }
    }
}

/// Shared authorization + mutation + broadcast pipeline
pub struct RealtimeRouter {
    messages: Arc<dyn MessageRepository>,
    gate: Arc<dyn MembershipGate>,
    directory: Arc<dyn EventDirectory>,
    registry: Arc<ChannelRegistry>,
    ids: SnowflakeGenerator,
    /// Per-message guards serializing mutate + broadcast, so frames for one
    /// message go out in commit order
    message_locks: DashMap<Snowflake, Arc<Mutex<()>>>,
    config: RouterConfig,
}

impl RealtimeRouter {
    /// Create a new router over the given store, gate and registry
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        gate: Arc<dyn MembershipGate>,
        directory: Arc<dyn EventDirectory>,
        registry: Arc<ChannelRegistry>,
        config: RouterConfig,
    ) -> Self {
        let ids = SnowflakeGenerator::new(config.worker_id);
        Self {
            messages,
            gate,
            directory,
            registry,
            ids,
            message_locks: DashMap::new(),
            config,
        }
    }

    /// The registry this router broadcasts through
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    async fn with_timeout<T>(
        &self,
        what: &'static str,
        fut: impl std::future::Future<Output = RepoResult<T>> + Send,
    ) -> RepoResult<T> {
        tokio::time::timeout(self.config.lookup_timeout, fut)
            .await
            .map_err(|_| DomainError::LookupTimeout(what))?
    }

    /// Verify the user may use the event's channel and the event still exists
    ///
    /// Membership is checked first: a non-member gets the same answer for a
    /// real event and a made-up id, so channel ids cannot be probed.
    async fn authorize(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<MembershipRole> {
        let role = self
            .with_timeout("membership gate", self.gate.check(user_id, event_id))
            .await?
            .ok_or(DomainError::NotAMember)?;

        let exists = self
            .with_timeout("event directory", self.directory.exists(event_id))
            .await?;
        if !exists {
            return Err(DomainError::EventNotFound(event_id));
        }

        Ok(role)
    }

    /// Load a message, resolving its store-recorded event id
    async fn load_message(&self, message_id: Snowflake) -> RepoResult<Message> {
        self.messages
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    fn lock_message(&self, message_id: Snowflake) -> Arc<Mutex<()>> {
        self.message_locks
            .entry(message_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Shed a message's lock entry once no other task holds a clone of it.
    /// Waiters clone the `Arc` before locking, so a contended entry survives.
    fn release_lock(&self, message_id: Snowflake) {
        self.message_locks
            .remove_if(&message_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn validate_text(text: &str) -> RepoResult<&str> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyText);
        }
        if trimmed.chars().count() > MAX_TEXT_LEN {
            return Err(DomainError::TextTooLong { max: MAX_TEXT_LEN });
        }
        Ok(trimmed)
    }

    // ========================================================================
    // Channel membership
    // ========================================================================

    /// Subscribe a connection to an event channel
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        connection: ConnectionId,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<()> {
        self.authorize(user_id, event_id).await?;
        self.registry.join(connection, event_id);
        Ok(())
    }

    /// Unsubscribe a connection from an event channel
    pub fn leave(&self, connection: ConnectionId, event_id: Snowflake) {
        self.registry.leave(connection, event_id);
    }

    /// Drop all of a connection's subscriptions and forget it
    pub fn disconnect(&self, connection: ConnectionId) {
        self.registry.unregister(connection);
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// List an event channel's messages, most recent first
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
        query: PageQuery,
    ) -> RepoResult<Vec<Message>> {
        self.authorize(user_id, event_id).await?;
        self.messages.find_by_event(event_id, query).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Post a new message to an event channel
    #[instrument(skip(self, text))]
    pub async fn create_message(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
        text: &str,
    ) -> RepoResult<Message> {
        self.authorize(user_id, event_id).await?;
        let text = Self::validate_text(text)?;

        let message = Message::new(self.ids.generate(), event_id, user_id, text.to_string());
        self.messages.create(&message).await?;

        self.registry
            .broadcast_to_event(event_id, &ServerEvent::MessageCreate(message.clone()), None);

        Ok(message)
    }

    /// Edit a message's text; only the sender may edit
    #[instrument(skip(self, text))]
    pub async fn update_message(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
        text: &str,
    ) -> RepoResult<Message> {
        let existing = self.load_message(message_id).await?;
        self.authorize(user_id, existing.event_id).await?;
        if !existing.is_sender(user_id) {
            return Err(DomainError::NotMessageSender);
        }
        let text = Self::validate_text(text)?;

        let lock = self.lock_message(message_id);
        let guard = lock.lock().await;

        let result = self
            .messages
            .edit(message_id, text)
            .await
            .and_then(|updated| updated.ok_or(DomainError::MessageNotFound(message_id)));

        if let Ok(updated) = &result {
            self.registry.broadcast_to_event(
                updated.event_id,
                &ServerEvent::MessageUpdate(updated.clone()),
                None,
            );
        }

        drop(guard);
        drop(lock);
        self.release_lock(message_id);
        result
    }

    /// Delete a message; only the sender may delete
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<()> {
        let existing = self.load_message(message_id).await?;
        self.authorize(user_id, existing.event_id).await?;
        if !existing.is_sender(user_id) {
            return Err(DomainError::NotMessageSender);
        }

        let lock = self.lock_message(message_id);
        let guard = lock.lock().await;

        let result = self.messages.delete(message_id).await.and_then(|removed| {
            removed
                .then_some(())
                .ok_or(DomainError::MessageNotFound(message_id))
        });

        if result.is_ok() {
            self.registry.broadcast_to_event(
                existing.event_id,
                &ServerEvent::MessageDelete {
                    message_id,
                    event_id: existing.event_id,
                },
                None,
            );
        }

        drop(guard);
        drop(lock);
        self.release_lock(message_id);
        result
    }

    /// Set the user's reaction on a message, replacing any previous one
    #[instrument(skip(self))]
    pub async fn set_reaction(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Message> {
        let existing = self.load_message(message_id).await?;
        self.authorize(user_id, existing.event_id).await?;
        if !Reaction::emoji_is_valid(emoji) {
            return Err(DomainError::InvalidEmoji);
        }

        let lock = self.lock_message(message_id);
        let guard = lock.lock().await;

        let result = self
            .messages
            .set_reaction(message_id, user_id, emoji)
            .await
            .and_then(|updated| updated.ok_or(DomainError::MessageNotFound(message_id)));

        if let Ok(updated) = &result {
            self.registry.broadcast_to_event(
                updated.event_id,
                &ServerEvent::MessageReaction(updated.clone()),
                None,
            );
        }

        drop(guard);
        drop(lock);
        self.release_lock(message_id);
        result
    }

    /// Remove the user's reaction from a message; no-op when none exists
    #[instrument(skip(self))]
    pub async fn clear_reaction(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<Message> {
        let existing = self.load_message(message_id).await?;
        self.authorize(user_id, existing.event_id).await?;

        let lock = self.lock_message(message_id);
        let guard = lock.lock().await;

        let result = self
            .messages
            .clear_reaction(message_id, user_id)
            .await
            .and_then(|updated| updated.ok_or(DomainError::MessageNotFound(message_id)));

        if let Ok(updated) = &result {
            self.registry.broadcast_to_event(
                updated.event_id,
                &ServerEvent::MessageReaction(updated.clone()),
                None,
            );
        }

        drop(guard);
        drop(lock);
        self.release_lock(message_id);
        result
    }

    // ========================================================================
    // Ephemeral signals
    // ========================================================================

    /// Relay a typing signal to the channel, excluding the origin connection
    #[instrument(skip(self))]
    pub async fn typing(
        &self,
        connection: ConnectionId,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<()> {
        self.authorize(user_id, event_id).await?;

        self.registry.broadcast_to_event(
            event_id,
            &ServerEvent::Typing { event_id, user_id },
            Some(connection),
        );

        Ok(())
    }
}
