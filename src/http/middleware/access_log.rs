//! Access logging and request metrics.
//!
//! Emits one structured event per request, including the peer address
//! when the server attached one. The level follows the response
//! class: `error` for 5xx, `warn` for 4xx, `info` otherwise.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::observability::metrics;

pub async fn access_log(
    State(service): State<&'static str>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let request_id = request_id(request.headers()).unwrap_or("-").to_owned();
    let client_ip = client_ip(&request);

    let response = next.run(request).await;

    let status = response.status();
    let latency = start.elapsed();
    metrics::record_request(service, method.as_str(), &route, status.as_u16(), latency);

    macro_rules! log_request {
        ($level:ident) => {
            tracing::$level!(
                service,
                status = status.as_u16(),
                method = %method,
                path = %path,
                route = %route,
                query = query.as_deref().unwrap_or(""),
                latency_ms = latency.as_secs_f64() * 1000.0,
                client_ip = %client_ip,
                user_agent = %user_agent,
                request_id = %request_id,
                "Request processed"
            )
        };
    }

    if status.is_server_error() {
        log_request!(error);
    } else if status.is_client_error() {
        log_request!(warn);
    } else {
        log_request!(info);
    }

    response
}

/// Peer IP from `ConnectInfo`, or `-` when the request did not arrive
/// over a tracked connection (e.g. in-process tests).
fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_owned())
}
