//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble a service router: `/health`, `/metrics`, and the service API
//! - Wire up middleware (request ID, tracing, access log + metrics, panic recovery)
//! - Accept connections and serve them with hyper, tracking each one so
//!   shutdown can drain them and force-close whatever outlives the grace period

use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinSet;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::health;
use crate::http::middleware::access_log;
use crate::http::request::{self, request_id};
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Error returned when the server stops abnormally.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrap a service API with the endpoints and layers every service shares.
pub fn service_router(name: &'static str, api: Router) -> Router {
    let handle = metrics::install_recorder();

    let router = Router::new()
        .route("/health", get(move || health::health(name)))
        .route(
            "/metrics",
            get(move || std::future::ready(handle.render())),
        )
        .merge(api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(name, access_log::access_log))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = request_id(req.headers()).unwrap_or("-"),
            )
        }));

    request::with_request_id(router)
}

/// A panicking handler answers 500 like any other internal failure.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Handler panicked");
    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// HTTP server for either service.
pub struct HttpServer {
    router: Router,
    grace: Duration,
}

impl HttpServer {
    pub fn new(router: Router, grace: Duration) -> Self {
        Self { router, grace }
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// After the signal the listener is closed and every connection is
    /// asked to finish its in-flight request. Connections still open when
    /// the grace period ends are aborted.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let (drain_tx, drain_rx) = watch::channel(false);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                // A closed channel means the coordinator is gone; stop as well.
                _ = shutdown.recv() => break,
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        connections.spawn(serve_connection(
                            self.router.clone(),
                            stream,
                            remote,
                            drain_rx.clone(),
                        ));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                    }
                },
            }
        }

        drop(listener);
        tracing::info!(
            connections = connections.len(),
            "Stopping listener, draining in-flight requests"
        );
        let _ = drain_tx.send(true);

        let drained = tokio::time::timeout(self.grace, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                grace_ms = self.grace.as_millis() as u64,
                connections = connections.len(),
                "Grace period elapsed, forcing remaining connections closed"
            );
            connections.shutdown().await;
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve one accepted connection until it closes.
///
/// The peer address is attached to every request as `ConnectInfo`. When
/// `draining` flips, the connection finishes its current request and closes.
async fn serve_connection(
    router: Router,
    stream: TcpStream,
    remote: SocketAddr,
    mut draining: watch::Receiver<bool>,
) {
    let service = service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(remote));
        router.clone().oneshot(request)
    });

    let builder = Builder::new(TokioExecutor::new());
    let connection = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let mut shutting_down = false;
    loop {
        tokio::select! {
            result = connection.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(peer = %remote, error = %e, "Connection closed with error");
                }
                break;
            }
            _ = draining.changed(), if !shutting_down => {
                shutting_down = true;
                connection.as_mut().graceful_shutdown();
            }
        }
    }
}
