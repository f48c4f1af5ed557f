//! Minimal microservice suite: an API gateway proxying to backend
//! services, and a user service with CRUD over PostgreSQL.

pub mod config;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod users;

pub use config::{GatewayConfig, UserServiceConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
