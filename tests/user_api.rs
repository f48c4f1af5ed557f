//! User service HTTP API against the in-memory repository.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use async_trait::async_trait;

use microsuite::users::{
    self, MemoryUserRepository, StoreError, User, UserError, UserRepository,
};

fn app() -> Router {
    users::build_app(Arc::new(MemoryUserRepository::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_list_starts_empty() {
    let (status, body) = send(&app(), Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_user() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/users",
        Some(json!({"email": "ada@example.com", "name": "Ada"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_without_email_is_bad_request() {
    let (status, body) =
        send(&app(), Method::POST, "/users", Some(json!({"name": "Ada"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_create_with_invalid_email_is_bad_request() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/users",
        Some(json!({"email": "ada-at-example", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let (status, body) = send(&app(), Method::GET, "/users/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_crud_lifecycle() {
    let app = app();

    let (_, created) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "ada@example.com", "name": "Ada"})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_owned();
    let item = format!("/users/{id}");

    let (status, fetched) = send(&app, Method::GET, &item, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created.clone()]));

    let (status, updated) =
        send(&app, Method::PUT, &item, Some(json!({"email": "", "name": "Ada L."}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["email"], "ada@example.com");
    assert_eq!(updated["name"], "Ada L.");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);

    let (status, body) = send(&app, Method::DELETE, &item, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &item, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let (status, body) =
        send(&app(), Method::PUT, "/users/missing", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_update_with_invalid_email_is_bad_request() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "ada@example.com", "name": "Ada"})),
    )
    .await;
    let item = format!("/users/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PUT, &item, Some(json!({"email": "broken"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_user_succeeds() {
    let (status, _) = send(&app(), Method::DELETE, "/users/never-existed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "UP", "name": "user-service"}));
}

#[tokio::test]
async fn test_request_id_is_generated_and_preserved() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!generated.is_empty());

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

/// Repository whose backing store is down; creates collide.
struct BrokenRepository;

fn store_down() -> UserError {
    UserError::Store(StoreError::Connection(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl UserRepository for BrokenRepository {
    async fn list(&self) -> Result<Vec<User>, UserError> {
        Err(store_down())
    }

    async fn get_by_id(&self, _id: &str) -> Result<User, UserError> {
        Err(store_down())
    }

    async fn create(&self, user: &User) -> Result<(), UserError> {
        Err(UserError::already_exists(&user.id))
    }

    async fn update(&self, _user: &User) -> Result<(), UserError> {
        Err(store_down())
    }

    async fn delete(&self, _id: &str) -> Result<(), UserError> {
        Err(store_down())
    }
}

#[tokio::test]
async fn test_store_failures_are_generic_internal_errors() {
    let app = users::build_app(Arc::new(BrokenRepository));
    let generic = json!({"error": "Internal server error"});

    let cases = [
        (Method::GET, "/users", None),
        (Method::GET, "/users/some-id", None),
        (
            Method::POST,
            "/users",
            Some(json!({"email": "ada@example.com", "name": "Ada"})),
        ),
        (Method::PUT, "/users/some-id", Some(json!({"name": "Ada"}))),
        (Method::DELETE, "/users/some-id", None),
    ];

    for (method, uri, body) in cases {
        let label = format!("{method} {uri}");
        let (status, value) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{label}");
        assert_eq!(value, generic, "{label}");
    }
}
