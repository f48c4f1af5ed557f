//! API gateway: forwards `/api/users` and `/api/products` to their
//! backend services.
//!
//! # Data Flow
//! ```text
//! Client → handlers.rs (route match, request id)
//!        → upstream.rs (outbound call via shared reqwest client)
//!        → handlers.rs (status/body relay)
//!        → Client
//! ```
//!
//! The gateway is stateless per request; it holds only the upstream base
//! URLs from `GatewayConfig`.

pub mod handlers;
pub mod upstream;

use axum::Router;

pub use upstream::{Upstream, UpstreamError, UpstreamResponse};

use crate::config::GatewayConfig;
use crate::http::server::service_router;

/// Service name reported by `/health` and used as a metrics label.
pub const SERVICE_NAME: &str = "api-gateway";

/// Upstreams shared by every proxy handler.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub users: Upstream,
    pub products: Upstream,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig, client: reqwest::Client) -> Self {
        Self {
            users: Upstream::new(
                "user-service",
                "users",
                config.user_service_url.clone(),
                client.clone(),
            ),
            products: Upstream::new(
                "product-service",
                "products",
                config.product_service_url.clone(),
                client,
            ),
        }
    }
}

/// Full gateway application for `config`.
pub fn build_app(config: &GatewayConfig) -> Result<Router, reqwest::Error> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("microsuite-gateway/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(service_router(
        SERVICE_NAME,
        handlers::routes(GatewayState::new(config, client)),
    ))
}
