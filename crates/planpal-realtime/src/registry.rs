//! Channel registry
//!
//! In-memory connection and subscription state, held with `DashMap` for
//! concurrent access. Purely volatile: nothing here survives a restart, and
//! a connection's subscriptions vanish with it.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use planpal_core::Snowflake;

use crate::events::ServerEvent;

/// Identifier for one WebSocket connection
pub type ConnectionId = Uuid;

/// Outbound handle for a registered connection
struct ConnectionHandle {
    user_id: Snowflake,
    sender: mpsc::Sender<ServerEvent>,
}

/// Registry of live connections and their event channel subscriptions
pub struct ChannelRegistry {
    /// Active connections by connection ID
    connections: DashMap<ConnectionId, ConnectionHandle>,

    /// Event ID to connection IDs mapping
    event_subscribers: DashMap<Snowflake, HashSet<ConnectionId>>,

    /// Connection ID to subscribed event IDs mapping
    connection_events: DashMap<ConnectionId, HashSet<Snowflake>>,
}

impl ChannelRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            event_subscribers: DashMap::new(),
            connection_events: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a connection and its outbound sender
    pub fn register(&self, user_id: Snowflake, sender: mpsc::Sender<ServerEvent>) -> ConnectionId {
        let id = Uuid::new_v4();
        self.connections.insert(id, ConnectionHandle { user_id, sender });

        tracing::debug!(connection_id = %id, user_id = %user_id, "Connection registered");

        id
    }

    /// Remove a connection and all of its subscriptions
    pub fn unregister(&self, id: ConnectionId) {
        self.leave_all(id);
        if self.connections.remove(&id).is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }
    }

    /// The user behind a connection, if it is still registered
    pub fn user_of(&self, id: ConnectionId) -> Option<Snowflake> {
        self.connections.get(&id).map(|h| h.user_id)
    }

    /// Subscribe a connection to an event channel
    pub fn join(&self, id: ConnectionId, event_id: Snowflake) -> bool {
        if !self.connections.contains_key(&id) {
            return false;
        }

        self.event_subscribers.entry(event_id).or_default().insert(id);
        self.connection_events.entry(id).or_default().insert(event_id);

        tracing::trace!(connection_id = %id, event_id = %event_id, "Joined event channel");

        true
    }

    /// Unsubscribe a connection from an event channel
    ///
    /// Uses `alter` plus `retain` for atomic modify-and-cleanup to avoid
    /// TOCTOU races on the subscriber sets.
    pub fn leave(&self, id: ConnectionId, event_id: Snowflake) {
        self.event_subscribers.alter(&event_id, |_, mut subs| {
            subs.remove(&id);
            subs
        });
        self.event_subscribers.retain(|_, subs| !subs.is_empty());

        self.connection_events.alter(&id, |_, mut events| {
            events.remove(&event_id);
            events
        });
        self.connection_events.retain(|_, events| !events.is_empty());

        tracing::trace!(connection_id = %id, event_id = %event_id, "Left event channel");
    }

    /// Drop every subscription a connection holds
    pub fn leave_all(&self, id: ConnectionId) {
        let events = self
            .connection_events
            .remove(&id)
            .map(|(_, events)| events)
            .unwrap_or_default();

        for event_id in events {
            self.event_subscribers.alter(&event_id, |_, mut subs| {
                subs.remove(&id);
                subs
            });
        }
        self.event_subscribers.retain(|_, subs| !subs.is_empty());
    }

    /// Event channels a connection is subscribed to
    pub fn subscriptions(&self, id: ConnectionId) -> Vec<Snowflake> {
        self.connection_events
            .get(&id)
            .map(|events| events.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Fan an event out to every subscriber of an event channel
    ///
    /// `exclude` skips the originating connection (used for typing). Sends
    /// are non-blocking: a subscriber whose buffer is full has the frame
    /// dropped rather than stalling the channel.
    pub fn broadcast_to_event(
        &self,
        event_id: Snowflake,
        event: &ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let subscribers: Vec<ConnectionId> = self
            .event_subscribers
            .get(&event_id)
            .map(|subs| subs.iter().copied().collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for id in subscribers {
            if Some(id) == exclude {
                continue;
            }
            if self.send_to(id, event.clone()) {
                delivered += 1;
            }
        }

        tracing::trace!(event_id = %event_id, delivered, "Broadcast dispatched");

        delivered
    }

    /// Send a frame to a single connection; returns whether it was queued
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let Some(handle) = self.connections.get(&id) else {
            return false;
        };

        match handle.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %id, "Outbound buffer full, frame dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of subscribers on an event channel
    pub fn subscriber_count(&self, event_id: Snowflake) -> usize {
        self.event_subscribers
            .get(&event_id)
            .map_or(0, |subs| subs.len())
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
