//! User service: CRUD over the `users` table.
//!
//! # Layering
//! ```text
//! handlers.rs   HTTP parsing, validation, status mapping
//!     → service.rs     id generation, timestamps, partial-update merge
//!     → repository.rs  typed records (PostgreSQL or memory.rs)
//!     → store.rs       parameterized SQL via sqlx
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;

pub use error::UserError;
pub use memory::MemoryUserRepository;
pub use model::{CreateUserRequest, UpdateUserRequest, User};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
pub use store::{StoreError, UserStore};

use crate::http::server::service_router;

/// Service name reported by `/health` and used as a metrics label.
pub const SERVICE_NAME: &str = "user-service";

/// Full user-service application over any repository.
pub fn build_app(repo: Arc<dyn UserRepository>) -> Router {
    service_router(SERVICE_NAME, handlers::routes(UserService::new(repo)))
}
