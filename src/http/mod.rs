//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign/preserve x-request-id)
//!     → TraceLayer span
//!     → middleware/access_log.rs (structured access log, request metrics)
//!     → service handlers (users / gateway)
//!     → response.rs (errors rendered as {"error": ...})
//! ```
//!
//! server.rs owns router assembly and the graceful-shutdown serve loop.

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{service_router, HttpServer, ServerError};
