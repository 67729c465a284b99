//! # planpal-gateway
//!
//! WebSocket gateway: authenticates connections, decodes client action
//! frames and drives them through the shared realtime router. Broadcast
//! fan-out happens in-process through the channel registry, so the gateway
//! holds no message state of its own.

pub mod protocol;
pub mod server;

pub use protocol::ClientAction;
pub use server::{create_app, GatewayState};
