//! Gateway shared state

use std::sync::Arc;

use planpal_common::JwtService;
use planpal_realtime::RealtimeRouter;

/// Shared state for the gateway
#[derive(Clone)]
pub struct GatewayState {
    router: Arc<RealtimeRouter>,
    jwt: Arc<JwtService>,
    send_buffer: usize,
}

impl GatewayState {
    /// Create new gateway state
    #[must_use]
    pub fn new(router: Arc<RealtimeRouter>, jwt: Arc<JwtService>, send_buffer: usize) -> Self {
        Self {
            router,
            jwt,
            send_buffer,
        }
    }

    /// The shared realtime router
    pub fn router(&self) -> &Arc<RealtimeRouter> {
        &self.router
    }

    /// JWT verifier for upgrade-time authentication
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Per-connection outbound frame buffer size
    pub fn send_buffer(&self) -> usize {
        self.send_buffer
    }
}
