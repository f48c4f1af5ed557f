//! HTTP handlers for `/users`.
//!
//! | Route              | Success | Failure                 |
//! |--------------------|---------|-------------------------|
//! | GET /users         | 200     | 500                     |
//! | GET /users/{id}    | 200     | 404, 500                |
//! | POST /users        | 201     | 400, 500                |
//! | PUT /users/{id}    | 200     | 400, 404, 500           |
//! | DELETE /users/{id} | 204     | 500                     |

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::http::ApiError;
use crate::users::error::UserError;
use crate::users::model::{CreateUserRequest, UpdateUserRequest, User};
use crate::users::service::UserService;

pub fn routes(service: UserService) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(service)
}

/// GET /users
pub async fn list_users(State(svc): State<UserService>) -> Result<Json<Vec<User>>, ApiError> {
    svc.get_users()
        .await
        .map(Json)
        .map_err(|e| log_failure("list users", None, e))
}

/// GET /users/{id}
pub async fn get_user(
    State(svc): State<UserService>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    svc.get_user(&id)
        .await
        .map(Json)
        .map_err(|e| log_failure("get user", Some(&id), e))
}

/// POST /users
pub async fn create_user(
    State(svc): State<UserService>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate(&req)?;

    let user = svc
        .create_user(req)
        .await
        .map_err(|e| log_failure("create user", None, e))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(svc): State<UserService>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(req) = payload?;
    validate(&req)?;

    svc.update_user(&id, req)
        .await
        .map(Json)
        .map_err(|e| log_failure("update user", Some(&id), e))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(svc): State<UserService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    svc.delete_user(&id)
        .await
        .map_err(|e| log_failure("delete user", Some(&id), e))?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|e| {
        tracing::warn!(error = %e, "Invalid request payload");
        ApiError::Validation("Invalid request payload".to_string())
    })
}

fn log_failure(operation: &'static str, id: Option<&str>, err: UserError) -> ApiError {
    match &err {
        UserError::NotFound { .. } => {
            tracing::warn!(operation, user_id = id.unwrap_or("-"), "User not found")
        }
        _ => tracing::error!(
            operation,
            user_id = id.unwrap_or("-"),
            error = %err,
            "User operation failed"
        ),
    }
    err.into()
}
