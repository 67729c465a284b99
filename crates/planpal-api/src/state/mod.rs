//! API shared state

use std::sync::Arc;

use planpal_common::JwtService;
use planpal_realtime::RealtimeRouter;

/// Shared state for the REST API
#[derive(Clone)]
pub struct AppState {
    router: Arc<RealtimeRouter>,
    jwt: Arc<JwtService>,
}

impl AppState {
    /// Create new application state
    #[must_use]
    pub fn new(router: Arc<RealtimeRouter>, jwt: Arc<JwtService>) -> Self {
        Self { router, jwt }
    }

    /// The shared realtime router
    pub fn router(&self) -> &Arc<RealtimeRouter> {
        &self.router
    }

    /// JWT verifier for request authentication
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt
    }
}
