//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (JSON in production)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! Request IDs flow through log spans and upstream calls (see `http::request`).

pub mod logging;
pub mod metrics;
