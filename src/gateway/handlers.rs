//! Proxy handlers for `/api/users` and `/api/products`.
//!
//! Each resource supports list, get-one and create. Bodies are relayed as
//! raw bytes, never decoded:
//! - upstream success → 200 for list/get, the upstream status for create
//! - upstream non-success → upstream status and body, verbatim
//! - upstream unreachable → 500 `{"error": "Failed to <operation>"}`

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::gateway::upstream::{Upstream, UpstreamError, UpstreamResponse};
use crate::gateway::GatewayState;
use crate::http::{request_id, ApiError};

pub fn routes(state: GatewayState) -> Router {
    let api = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product));

    Router::new().nest("/api", api).with_state(state)
}

pub async fn list_users(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    list(&state.users, &headers, "Failed to get users").await
}

pub async fn get_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    get_one(&state.users, &id, &headers, "Failed to get user").await
}

pub async fn create_user(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    create(&state.users, body, &headers, "Failed to create user").await
}

pub async fn list_products(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    list(&state.products, &headers, "Failed to get products").await
}

pub async fn get_product(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    get_one(&state.products, &id, &headers, "Failed to get product").await
}

pub async fn create_product(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    create(&state.products, body, &headers, "Failed to create product").await
}

async fn list(upstream: &Upstream, headers: &HeaderMap, failure: &'static str) -> Response {
    match upstream.get(None, request_id(headers)).await {
        Ok(reply) => relay(upstream, reply, Some(StatusCode::OK)),
        Err(e) => unreachable_upstream(upstream, failure, e),
    }
}

async fn get_one(
    upstream: &Upstream,
    id: &str,
    headers: &HeaderMap,
    failure: &'static str,
) -> Response {
    match upstream.get(Some(id), request_id(headers)).await {
        Ok(reply) => relay(upstream, reply, Some(StatusCode::OK)),
        Err(e) => unreachable_upstream(upstream, failure, e),
    }
}

async fn create(
    upstream: &Upstream,
    body: Bytes,
    headers: &HeaderMap,
    failure: &'static str,
) -> Response {
    match upstream.post_json(body, request_id(headers)).await {
        Ok(reply) => relay(upstream, reply, None),
        Err(e) => unreachable_upstream(upstream, failure, e),
    }
}

/// Turn an upstream reply into the gateway response.
///
/// `success_status` overrides the status of a 2xx reply; `None` keeps it.
fn relay(
    upstream: &Upstream,
    reply: UpstreamResponse,
    success_status: Option<StatusCode>,
) -> Response {
    let status = if reply.status.is_success() {
        success_status.unwrap_or(reply.status)
    } else {
        tracing::warn!(
            upstream = upstream.service(),
            resource = upstream.resource(),
            status = reply.status.as_u16(),
            "Upstream returned non-success status"
        );
        reply.status
    };

    let content_type = reply
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    (status, [(header::CONTENT_TYPE, content_type)], Body::from(reply.body)).into_response()
}

fn unreachable_upstream(upstream: &Upstream, failure: &'static str, err: UpstreamError) -> Response {
    tracing::error!(
        upstream = upstream.service(),
        resource = upstream.resource(),
        error = %err,
        "{failure}"
    );
    ApiError::Internal(failure.to_string()).into_response()
}
