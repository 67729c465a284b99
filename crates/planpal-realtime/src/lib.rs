//! # planpal-realtime
//!
//! Realtime layer: the channel registry and the router that both the REST
//! API and the WebSocket gateway drive.
//!
//! ## Overview
//!
//! Every message mutation, whichever door it arrives through, goes through
//! [`RealtimeRouter`]: authorize, mutate the store, then broadcast the
//! committed state to the event's subscribers. The [`ChannelRegistry`] holds
//! the in-memory connection ↔ event subscription state that broadcasts fan
//! out over.

pub mod events;
pub mod registry;
pub mod router;

pub use events::ServerEvent;
pub use registry::{ChannelRegistry, ConnectionId};
pub use router::{RealtimeRouter, RouterConfig};
