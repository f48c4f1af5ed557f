//! API gateway.
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!   GET/POST          │          api-gateway          │
//!   /api/users ───────┼─▶ users upstream ────────────┼──▶ user-service
//!   /api/products ────┼─▶ products upstream ─────────┼──▶ product-service
//!                     │                              │
//!   /health, /metrics │  request id · access log ·   │
//!                     │  metrics · graceful shutdown │
//!                     └──────────────────────────────┘
//! ```

use std::process::ExitCode;

use microsuite::config::{self, Environment, GatewayConfig};
use microsuite::gateway;
use microsuite::lifecycle::{startup, StartupError};
use microsuite::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match config::load_gateway_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(gateway::SERVICE_NAME, &Environment::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    logging::init(gateway::SERVICE_NAME, &config.environment);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "API gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    tracing::info!(
        port = config.listener.port,
        user_service_url = %config.user_service_url,
        product_service_url = %config.product_service_url,
        environment = %config.environment,
        "Configuration loaded"
    );

    let app = gateway::build_app(&config)?;
    startup::serve(&config.listener, config.shutdown_grace, app).await
}
