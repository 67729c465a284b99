//! Server setup and initialization
//!
//! Builds the one shared realtime router and mounts both doors on it: the
//! REST app on the API port and the WebSocket gateway on the gateway port.
//! Sharing the router (and its channel registry) is what makes a REST
//! mutation broadcast to live connections.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use planpal_common::{AppConfig, AppError, CorsConfig, JwtService};
use planpal_db::{
    create_pool, PgEventDirectory, PgMembershipGate, PgMessageRepository,
};
use planpal_gateway::GatewayState;
use planpal_realtime::{ChannelRegistry, RealtimeRouter, RouterConfig};

use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete REST application with routes and middleware
pub fn create_app(state: AppState, cors: &CorsConfig) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Initialize all dependencies and create `AppState`
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    let router = create_realtime_router(config).await?;
    let jwt = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    Ok(AppState::new(router, jwt))
}

/// Build the shared realtime router over a fresh database pool
pub async fn create_realtime_router(
    config: &AppConfig,
) -> Result<Arc<RealtimeRouter>, AppError> {
    info!("Connecting to PostgreSQL...");
    let mut db_config = planpal_db::DatabaseConfig::new(config.database.url.clone());
    db_config.max_connections = config.database.max_connections;
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    Ok(Arc::new(RealtimeRouter::new(
        Arc::new(PgMessageRepository::new(pool.clone())),
        Arc::new(PgMembershipGate::new(pool.clone())),
        Arc::new(PgEventDirectory::new(pool)),
        ChannelRegistry::new_shared(),
        RouterConfig {
            lookup_timeout: Duration::from_millis(config.realtime.lookup_timeout_ms),
            worker_id: config.snowflake.worker_id,
        },
    )))
}

/// Run the REST API and the WebSocket gateway until shutdown
///
/// # Errors
/// Returns an error when dependencies cannot be initialized, a listener
/// cannot bind, or either server fails.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let router = create_realtime_router(&config).await?;
    let jwt = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    let api_app = create_app(AppState::new(router.clone(), jwt.clone()), &config.cors);
    let gateway_app = planpal_gateway::create_app(GatewayState::new(
        router,
        jwt,
        config.realtime.send_buffer,
    ));

    let api_addr = config.api.address();
    let gateway_addr = config.gateway.address();

    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let gateway_listener = tokio::net::TcpListener::bind(&gateway_addr)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    info!(%api_addr, "API listening");
    info!(%gateway_addr, "Gateway listening");

    tokio::try_join!(
        async { axum::serve(api_listener, api_app).await },
        async { axum::serve(gateway_listener, gateway_app).await },
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(())
}
