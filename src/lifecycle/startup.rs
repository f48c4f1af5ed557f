//! Startup orchestration shared by both binaries.
//!
//! Listeners are bound last, once every other subsystem is ready, and any
//! failure along the way is fatal.

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ListenerConfig};
use crate::http::server::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::users::store::StoreError;

/// Fatal startup or serving failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Bind the configured listener.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    Ok(listener)
}

/// Bind, then serve `app` until SIGINT/SIGTERM and the drain completes.
pub async fn serve(
    config: &ListenerConfig,
    shutdown_grace: std::time::Duration,
    app: Router,
) -> Result<(), StartupError> {
    let listener = bind(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::trigger_on_termination(shutdown));

    HttpServer::new(app, shutdown_grace)
        .run(listener, server_shutdown)
        .await?;
    Ok(())
}
