//! PlanPal chat server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p planpal-api
//! ```
//!
//! Serves the REST API and the WebSocket gateway from one process, over one
//! shared realtime router. Configuration is loaded from environment
//! variables.

use planpal_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting PlanPal chat server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        api_port = config.api.port,
        gateway_port = config.gateway.port,
        "Configuration loaded"
    );

    planpal_api::run(config).await?;

    Ok(())
}
