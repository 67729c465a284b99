//! In-memory store, gate and directory fakes plus a pipeline builder

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use planpal_core::{
    EventDirectory, MembershipGate, MembershipRole, Message, MessageRepository, PageQuery,
    Reaction, RepoResult, Snowflake,
};
use planpal_realtime::{
    ChannelRegistry, ConnectionId, RealtimeRouter, RouterConfig, ServerEvent,
};

pub const EVENT_A: Snowflake = Snowflake::new(100);
pub const EVENT_B: Snowflake = Snowflake::new(101);
/// Known to the membership gate but gone from the directory, as after a
/// concurrent event deletion
pub const VANISHED_EVENT: Snowflake = Snowflake::new(102);
pub const MEMBER_ALICE: Snowflake = Snowflake::new(1);
pub const MEMBER_BOB: Snowflake = Snowflake::new(2);
pub const OUTSIDER: Snowflake = Snowflake::new(9);

/// In-memory message store keyed by id (ordered, like the real store's
/// id-ordered listing)
pub struct MemoryStore {
    messages: Mutex<BTreeMap<i64, Message>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    /// Fetch a stored message directly, bypassing the router
    pub async fn find_message(&self, id: Snowflake) -> Option<Message> {
        self.messages.lock().await.get(&id.into_inner()).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.messages.lock().await.get(&id.into_inner()).cloned())
    }

    async fn find_by_event(
        &self,
        event_id: Snowflake,
        query: PageQuery,
    ) -> RepoResult<Vec<Message>> {
        let messages = self.messages.lock().await;
        Ok(messages
            .values()
            .rev()
            .filter(|m| m.event_id == event_id)
            .skip(usize::try_from(query.offset()).unwrap_or(0))
            .take(usize::try_from(query.limit()).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages
            .lock()
            .await
            .insert(message.id.into_inner(), message.clone());
        Ok(())
    }

    async fn edit(&self, id: Snowflake, text: &str) -> RepoResult<Option<Message>> {
        let mut messages = self.messages.lock().await;
        Ok(messages.get_mut(&id.into_inner()).map(|m| {
            m.edit(text.to_string());
            m.clone()
        }))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.messages.lock().await.remove(&id.into_inner()).is_some())
    }

    async fn set_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Option<Message>> {
        let mut messages = self.messages.lock().await;
        Ok(messages.get_mut(&message_id.into_inner()).map(|m| {
            m.apply_reaction(Reaction::new(message_id, user_id, emoji.to_string()));
            m.clone()
        }))
    }

    async fn clear_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Message>> {
        let mut messages = self.messages.lock().await;
        Ok(messages.get_mut(&message_id.into_inner()).map(|m| {
            m.remove_reaction(user_id);
            m.clone()
        }))
    }
}

/// Membership gate backed by a static (event, user) -> role table, with an
/// optional artificial delay for timeout tests
pub struct TableGate {
    roles: HashMap<(i64, i64), MembershipRole>,
    delay: Duration,
}

#[async_trait]
impl MembershipGate for TableGate {
    async fn check(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self
            .roles
            .get(&(event_id.into_inner(), user_id.into_inner()))
            .copied())
    }
}

/// Event directory backed by a static id set
pub struct TableDirectory {
    events: HashSet<i64>,
}

#[async_trait]
impl EventDirectory for TableDirectory {
    async fn exists(&self, event_id: Snowflake) -> RepoResult<bool> {
        Ok(self.events.contains(&event_id.into_inner()))
    }
}

/// A fully wired realtime pipeline over in-memory fakes
///
/// Events A and B exist; Alice and Bob are members of both (and of the
/// vanished event the directory no longer knows); the outsider is a member
/// of nothing.
pub struct TestPipeline {
    pub router: Arc<RealtimeRouter>,
    pub store: Arc<MemoryStore>,
}

impl TestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::build(Duration::from_secs(5), Duration::ZERO)
    }

    /// Pipeline whose membership gate stalls for `gate_delay` on every check
    #[must_use]
    pub fn with_gate_delay(gate_delay: Duration, lookup_timeout: Duration) -> Self {
        Self::build(lookup_timeout, gate_delay)
    }

    fn build(lookup_timeout: Duration, gate_delay: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());

        let mut roles = HashMap::new();
        for event in [EVENT_A, EVENT_B, VANISHED_EVENT] {
            roles.insert(
                (event.into_inner(), MEMBER_ALICE.into_inner()),
                MembershipRole::Owner,
            );
            roles.insert(
                (event.into_inner(), MEMBER_BOB.into_inner()),
                MembershipRole::Member,
            );
        }

        let router = Arc::new(RealtimeRouter::new(
            store.clone(),
            Arc::new(TableGate {
                roles,
                delay: gate_delay,
            }),
            Arc::new(TableDirectory {
                events: [EVENT_A.into_inner(), EVENT_B.into_inner()]
                    .into_iter()
                    .collect(),
            }),
            ChannelRegistry::new_shared(),
            RouterConfig {
                lookup_timeout,
                worker_id: 0,
            },
        ));

        Self { router, store }
    }

    /// Register a connection for a user and subscribe it to an event
    pub async fn connect_and_join(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (connection, rx) = self.connect(user_id);
        self.router
            .join(connection, user_id, event_id)
            .await
            .expect("join failed");
        (connection, rx)
    }

    /// Register a connection without subscribing it to anything
    pub fn connect(&self, user_id: Snowflake) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(32);
        let connection = self.router.registry().register(user_id, tx);
        (connection, rx)
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}
